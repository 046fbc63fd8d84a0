//! Topological ordering of registry components using depth-first search
//!
//! Uses DFS with three-color marking:
//!
//! 1. **WHITE** (unvisited): not in either set
//! 2. **GRAY** (in progress): on the current DFS stack
//! 3. **BLACK** (resolved): appended to the output
//!
//! Reaching a GRAY node is a cycle. The stack is kept ordered so the
//! offending path can be reported (`a -> b -> a`).
//!
//! ```text
//! Dependencies:
//!   dialog depends on modal, text
//!   modal  depends on nothing
//!   text   depends on nothing
//!
//! Roots: ["dialog"]
//!
//! Result: [modal, text, dialog]
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::error::{ComponentryError, Result};
use crate::manifest::Manifest;

/// Traversal state for one `topological_order` call
struct TopoSortContext<'a> {
    manifest: &'a Manifest,
    /// Resolved names (BLACK), mirrored by `order` for membership checks
    resolved: HashSet<String>,
    /// Output in install order
    order: Vec<String>,
    /// Current DFS stack (GRAY), in visiting order
    in_progress: Vec<String>,
}

/// Order the transitive closure of `roots` so dependencies come first
///
/// Roots are processed left to right; a root already pulled in by an earlier
/// root is skipped. Dependencies are visited in declaration order.
///
/// # Errors
///
/// - `ComponentNotFound` if a root or any transitive dependency is missing
/// - `CycleDetected` if a component depends on itself, directly or not
pub fn topological_order<S: AsRef<str>>(manifest: &Manifest, roots: &[S]) -> Result<Vec<String>> {
    let mut ctx = TopoSortContext {
        manifest,
        resolved: HashSet::new(),
        order: Vec::new(),
        in_progress: Vec::new(),
    };

    for root in roots {
        topo_dfs(&mut ctx, root.as_ref(), None)?;
    }

    Ok(ctx.order)
}

/// Post-order DFS: a name is appended after all of its dependencies
fn topo_dfs(ctx: &mut TopoSortContext, name: &str, required_by: Option<&str>) -> Result<()> {
    if ctx.resolved.contains(name) {
        return Ok(());
    }

    if let Some(start) = ctx.in_progress.iter().position(|n| n == name) {
        let mut cycle = ctx.in_progress[start..].to_vec();
        cycle.push(name.to_string());
        return Err(ComponentryError::CycleDetected { cycle });
    }

    let manifest = ctx.manifest;
    let descriptor = manifest.get(name).inspect_err(|_| {
        if let Some(parent) = required_by {
            debug!(missing = name, required_by = parent, "unknown dependency");
        }
    })?;

    ctx.in_progress.push(name.to_string());

    for dep in &descriptor.internal_dependencies {
        topo_dfs(ctx, dep, Some(name))?;
    }

    ctx.in_progress.pop();
    ctx.resolved.insert(name.to_string());
    ctx.order.push(name.to_string());
    debug!(component = name, position = ctx.order.len(), "resolved");

    Ok(())
}
