//! In-process registry cache
//!
//! One command run fetches the manifest once and each file at most once.
//! Failed fetches are not cached. [`RegistryCache::invalidate`] drops
//! everything so the next call goes back to the source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::error::Result;
use crate::manifest::{ComponentDescriptor, Manifest};
use crate::project::Framework;

use super::RegistrySource;

/// Caching wrapper around a [`RegistrySource`]
pub struct RegistryCache {
    source: Box<dyn RegistrySource>,
    manifest: Mutex<Option<Arc<Manifest>>>,
    files: Mutex<HashMap<String, String>>,
    themes: Mutex<HashMap<Framework, Vec<String>>>,
}

/// A poisoned lock only means another fetch panicked; the map is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RegistryCache {
    pub fn new(source: Box<dyn RegistrySource>) -> Self {
        Self {
            source,
            manifest: Mutex::new(None),
            files: Mutex::new(HashMap::new()),
            themes: Mutex::new(HashMap::new()),
        }
    }

    /// Shared manifest, fetched on first use
    pub fn manifest(&self) -> Result<Arc<Manifest>> {
        if let Some(manifest) = lock(&self.manifest).as_ref() {
            return Ok(Arc::clone(manifest));
        }

        let manifest = Arc::new(self.source.fetch_manifest()?);
        debug!(components = manifest.len(), "manifest cached");
        *lock(&self.manifest) = Some(Arc::clone(&manifest));
        Ok(manifest)
    }

    /// Drop every cached entry
    #[allow(dead_code)] // used in tests
    pub fn invalidate(&self) {
        *lock(&self.manifest) = None;
        lock(&self.files).clear();
        lock(&self.themes).clear();
        debug!("registry cache invalidated");
    }

    fn cached_file(&self, key: String, fetch: impl FnOnce() -> Result<String>) -> Result<String> {
        if let Some(content) = lock(&self.files).get(&key) {
            return Ok(content.clone());
        }

        // Fetch without holding the lock so parallel fetches of other files proceed
        let content = fetch()?;
        lock(&self.files).insert(key, content.clone());
        Ok(content)
    }
}

impl RegistrySource for RegistryCache {
    fn fetch_manifest(&self) -> Result<Manifest> {
        self.manifest().map(|m| (*m).clone())
    }

    fn fetch_component_source(
        &self,
        framework: Framework,
        component: &ComponentDescriptor,
    ) -> Result<String> {
        self.cached_file(super::component_path(framework, component), || {
            self.source.fetch_component_source(framework, component)
        })
    }

    fn fetch_utility_file(&self, framework: Framework, path: &str) -> Result<String> {
        self.cached_file(super::utility_path(framework, path), || {
            self.source.fetch_utility_file(framework, path)
        })
    }

    fn fetch_theme_source(&self, framework: Framework, theme: &str) -> Result<String> {
        self.cached_file(super::theme_path(framework, theme), || {
            self.source.fetch_theme_source(framework, theme)
        })
    }

    fn list_available_themes(&self, framework: Framework) -> Result<Vec<String>> {
        if let Some(themes) = lock(&self.themes).get(&framework) {
            return Ok(themes.clone());
        }

        let themes = self.source.list_available_themes(framework)?;
        lock(&self.themes).insert(framework, themes.clone());
        Ok(themes)
    }
}
