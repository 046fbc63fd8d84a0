//! Command implementations for the componentry CLI

use std::path::PathBuf;

pub mod add;
pub mod completions;
pub mod helpers;
pub mod init;
pub mod list;

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Project directory override (`--cwd`)
    pub cwd: Option<PathBuf>,
    /// Registry URL or directory (`--registry` / `COMPONENTRY_REGISTRY`)
    pub registry: Option<String>,
}
