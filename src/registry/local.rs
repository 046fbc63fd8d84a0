//! Registry stored in a local directory

use std::path::PathBuf;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ComponentryError, Result};
use crate::manifest::{ComponentDescriptor, Manifest};
use crate::project::Framework;

use super::RegistrySource;

/// Registry laid out on disk, used for development and offline installs
#[derive(Debug, Clone)]
pub struct LocalRegistry {
    root: PathBuf,
}

impl LocalRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, relative: &str) -> Result<String> {
        let path = self.root.join(relative);
        debug!(path = %path.display(), "reading");
        std::fs::read_to_string(&path).map_err(|e| ComponentryError::Network {
            url: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Theme names from the `.ts` files in the themes directory
    fn scan_themes(&self, framework: Framework) -> Result<Vec<String>> {
        let dir = self.root.join(framework.as_str()).join("themes");
        if !dir.is_dir() {
            return Err(ComponentryError::Network {
                url: dir.display().to_string(),
                reason: "themes directory not found".to_string(),
            });
        }

        let mut themes: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "ts") {
                    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
                } else {
                    None
                }
            })
            .filter(|name| name != "index")
            .collect();
        themes.sort();
        Ok(themes)
    }
}

impl RegistrySource for LocalRegistry {
    fn fetch_manifest(&self) -> Result<Manifest> {
        let content = self.read(super::MANIFEST_FILE)?;
        Manifest::from_json(&content)
    }

    fn fetch_component_source(
        &self,
        framework: Framework,
        component: &ComponentDescriptor,
    ) -> Result<String> {
        self.read(&super::component_path(framework, component))
    }

    fn fetch_utility_file(&self, framework: Framework, path: &str) -> Result<String> {
        self.read(&super::utility_path(framework, path))
    }

    fn fetch_theme_source(&self, framework: Framework, theme: &str) -> Result<String> {
        self.read(&super::theme_path(framework, theme))
    }

    /// Reads `themes/index.json` when present, otherwise lists the directory
    fn list_available_themes(&self, framework: Framework) -> Result<Vec<String>> {
        let index = self.root.join(super::theme_index_path(framework));
        if !index.is_file() {
            return self.scan_themes(framework);
        }

        let content = self.read(&super::theme_index_path(framework))?;
        serde_json::from_str(&content).map_err(|e| ComponentryError::Network {
            url: index.display().to_string(),
            reason: format!("invalid theme index: {e}"),
        })
    }
}
