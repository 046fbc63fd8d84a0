//! Project adapter
//!
//! A project is the consumer's app: a directory with `package.json` and,
//! once initialized, a `componentry.json`. This module detects the
//! framework, loads and writes the config, maps components to destination
//! paths and guards the project against concurrent invocations.

use std::fs;
use std::path::{Path, PathBuf};

use fslock::LockFile;
use tracing::debug;

use crate::error::{ComponentryError, Result};
use crate::manifest::{ComponentDescriptor, ComponentKind};

pub mod alias;
pub mod config;
pub mod detection;

pub use config::ProjectConfig;
pub use detection::{Framework, ProjectDescriptor, detect_project, validate_project_structure};

/// Project config filename
pub const CONFIG_FILE: &str = "componentry.json";

/// Advisory lock filename
pub const LOCK_FILE: &str = ".componentry.lock";

/// Generated theme index filename inside the theme directory
pub const THEME_INDEX_FILE: &str = "index.ts";

/// An initialized project
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

/// Held while a command modifies the project; releases on drop
pub struct ProjectGuard {
    lock: LockFile,
    lock_path: PathBuf,
}

impl Project {
    /// Open an initialized project by loading its config
    pub fn open(root: &Path) -> Result<Self> {
        let config = ProjectConfig::load(root)?;
        debug!(root = %root.display(), framework = %config.framework, "project opened");
        Ok(Self::new(root, config))
    }

    /// Project with a config that may not be on disk yet
    pub fn new(root: &Path, config: ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn framework(&self) -> Framework {
        self.config.framework
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Where a component lands, chosen by its kind
    pub fn destination_for(&self, component: &ComponentDescriptor) -> PathBuf {
        let dir = match component.kind {
            ComponentKind::UiComponent => &self.config.dirs.components,
            ComponentKind::Hook => &self.config.dirs.hooks,
            ComponentKind::LibraryFile => &self.config.dirs.lib,
        };
        self.root.join(dir).join(component.file_name())
    }

    /// Where a utility file lands inside the lib directory
    pub fn utility_destination(&self, path: &str) -> PathBuf {
        self.root.join(&self.config.dirs.lib).join(path)
    }

    pub fn theme_dir(&self) -> PathBuf {
        self.root.join(&self.config.dirs.theme)
    }

    pub fn theme_destination(&self, theme: &str) -> PathBuf {
        self.theme_dir().join(format!("{theme}.ts"))
    }

    pub fn theme_index_path(&self) -> PathBuf {
        self.theme_dir().join(THEME_INDEX_FILE)
    }

    /// Path relative to the project root, for display and import rewriting
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Take the project lock without blocking
    pub fn lock(&self) -> Result<ProjectGuard> {
        ProjectGuard::acquire(&self.root)
    }
}

impl ProjectGuard {
    pub fn acquire(root: &Path) -> Result<Self> {
        let lock_path = root.join(LOCK_FILE);
        let locked = || ComponentryError::ProjectLocked {
            path: lock_path.display().to_string(),
        };

        let mut lock = LockFile::open(&lock_path).map_err(|e| ComponentryError::Io {
            message: format!("Failed to open lock file {}: {}", lock_path.display(), e),
        })?;

        let acquired = lock.try_lock().map_err(|_| locked())?;
        if !acquired {
            return Err(locked());
        }

        debug!(path = %lock_path.display(), "project locked");
        Ok(Self { lock, lock_path })
    }
}

impl Drop for ProjectGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
        let _ = fs::remove_file(&self.lock_path);
    }
}
