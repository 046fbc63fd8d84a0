//! Dependency resolution for registry components
//!
//! This module handles:
//! - Expanding requested component names into their transitive closure
//! - Topological ordering so dependencies are installed first
//! - Circular dependency and unknown component detection
//! - Collecting external packages and utility files for a resolved set

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::manifest::{ComponentDescriptor, Manifest};

pub mod sort;

/// Components in install order: every name comes after its dependencies
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    order: Vec<String>,
}

impl Resolution {
    /// Names in install order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    #[allow(dead_code)] // used in tests
    pub fn contains(&self, name: &str) -> bool {
        self.order.iter().any(|n| n == name)
    }

    /// Index of `name` in install order
    #[allow(dead_code)] // used in tests
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    #[allow(dead_code)] // used in tests
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)] // used in tests
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Dependency resolver over one manifest snapshot
///
/// The manifest is shared with the registry cache that produced it, so a
/// resolver never observes a manifest swapped out mid-command.
#[derive(Debug, Clone)]
pub struct Resolver {
    manifest: Arc<Manifest>,
}

impl Resolver {
    pub fn new(manifest: Arc<Manifest>) -> Self {
        Self { manifest }
    }

    /// Resolve the requested roots into an ordered install set
    ///
    /// # Errors
    ///
    /// Returns `ComponentNotFound` for unknown names and `CycleDetected` when
    /// the manifest's dependency graph is not a DAG.
    pub fn resolve<S: AsRef<str>>(&self, roots: &[S]) -> Result<Resolution> {
        let order = sort::topological_order(&self.manifest, roots)?;
        debug!(?order, "resolution complete");
        Ok(Resolution { order })
    }

    /// Look up a single component
    pub fn component(&self, name: &str) -> Result<&ComponentDescriptor> {
        self.manifest.get(name)
    }

    /// Union of external packages declared by `names`, first-seen order
    pub fn external_dependencies<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        self.collect_unique(names, |d| &d.external_dependencies)
    }

    /// Union of utility files declared by `names`, first-seen order
    pub fn utility_files<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        self.collect_unique(names, |d| &d.utility_files)
    }

    fn collect_unique<S, F>(&self, names: &[S], field: F) -> Result<Vec<String>>
    where
        S: AsRef<str>,
        F: Fn(&ComponentDescriptor) -> &Vec<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for name in names {
            let descriptor = self.component(name.as_ref())?;
            for item in field(descriptor) {
                if seen.insert(item.as_str()) {
                    out.push(item.clone());
                }
            }
        }
        Ok(out)
    }
}
