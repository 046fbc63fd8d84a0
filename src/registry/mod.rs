//! Registry access
//!
//! The registry serves one manifest plus per-framework source files:
//!
//! ```text
//! registry.json                      # component manifest
//! <framework>/components/<file>      # component sources
//! <framework>/lib/<path>             # utility files
//! <framework>/themes/<theme>.ts      # theme sources
//! <framework>/themes/index.json      # ["default", "dark", ...]
//! ```
//!
//! [`HttpRegistry`] reads it over HTTP(S), [`LocalRegistry`] from a
//! directory with the same layout. Both sit behind [`RegistrySource`] and
//! are wrapped by the explicit [`RegistryCache`].

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{ComponentryError, Result};
use crate::manifest::{ComponentDescriptor, Manifest};
use crate::project::Framework;

mod cache;
mod http;
mod local;

pub use cache::RegistryCache;
pub use http::HttpRegistry;
pub use local::LocalRegistry;

/// Public registry used when neither `--registry` nor the env var is set
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.componentry.dev";

/// Environment variable overriding the registry location
pub const REGISTRY_ENV: &str = "COMPONENTRY_REGISTRY";

/// Manifest file at the registry root
pub const MANIFEST_FILE: &str = "registry.json";

/// Theme list inside each framework's themes directory
pub const THEME_INDEX_FILE: &str = "index.json";

/// Content provider for components and themes
///
/// Every fetch may fail with [`ComponentryError::Network`]; implementations
/// never report a missing file as `ComponentNotFound`, which is reserved for
/// names the manifest does not know.
pub trait RegistrySource: Send + Sync {
    fn fetch_manifest(&self) -> Result<Manifest>;
    fn fetch_component_source(
        &self,
        framework: Framework,
        component: &ComponentDescriptor,
    ) -> Result<String>;
    fn fetch_utility_file(&self, framework: Framework, path: &str) -> Result<String>;
    fn fetch_theme_source(&self, framework: Framework, theme: &str) -> Result<String>;
    fn list_available_themes(&self, framework: Framework) -> Result<Vec<String>>;
}

/// Registry-relative path of a component source
pub(crate) fn component_path(framework: Framework, component: &ComponentDescriptor) -> String {
    format!("{}/components/{}", framework.as_str(), component.file_name())
}

/// Registry-relative path of a utility file
pub(crate) fn utility_path(framework: Framework, path: &str) -> String {
    format!("{}/lib/{}", framework.as_str(), path)
}

/// Registry-relative path of a theme source
pub(crate) fn theme_path(framework: Framework, theme: &str) -> String {
    format!("{}/themes/{}.ts", framework.as_str(), theme)
}

/// Registry-relative path of the theme list
pub(crate) fn theme_index_path(framework: Framework) -> String {
    format!("{}/themes/{}", framework.as_str(), THEME_INDEX_FILE)
}

/// Theme names share the component naming rules; they become file names
pub fn validate_theme_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        });
    if valid {
        Ok(())
    } else {
        Err(ComponentryError::Validation {
            message: format!("'{name}' is not a valid theme name (expected lowercase-hyphenated)"),
        })
    }
}

/// Where the registry lives, as given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryLocation {
    Remote(Url),
    Local(PathBuf),
}

impl RegistryLocation {
    /// Parse a `--registry` value
    ///
    /// `http(s)://` URLs are remote, `file://` URLs and anything else are
    /// treated as a directory path (relative to `base`).
    pub fn parse(value: &str, base: &Path) -> Result<Self> {
        if value.starts_with("http://") || value.starts_with("https://") {
            let url = Url::parse(value).map_err(|e| ComponentryError::Validation {
                message: format!("Invalid registry URL '{value}': {e}"),
            })?;
            return Ok(Self::Remote(url));
        }

        if value.starts_with("file://") {
            let url = Url::parse(value).map_err(|e| ComponentryError::Validation {
                message: format!("Invalid registry URL '{value}': {e}"),
            })?;
            let path = url.to_file_path().map_err(|()| ComponentryError::Validation {
                message: format!("Registry URL '{value}' is not a local path"),
            })?;
            return Ok(Self::Local(path));
        }

        let path = Path::new(value);
        if path.is_absolute() {
            Ok(Self::Local(path.to_path_buf()))
        } else {
            Ok(Self::Local(base.join(path)))
        }
    }

    /// Build the source for this location
    pub fn open(&self) -> Result<Box<dyn RegistrySource>> {
        match self {
            Self::Remote(url) => Ok(Box::new(HttpRegistry::new(url.clone())?)),
            Self::Local(path) => Ok(Box::new(LocalRegistry::new(path.clone()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote() {
        let location = RegistryLocation::parse("https://example.com/r", Path::new("/")).unwrap();
        assert!(matches!(location, RegistryLocation::Remote(ref u) if u.as_str() == "https://example.com/r"));
    }

    #[test]
    fn test_parse_relative_path() {
        let location = RegistryLocation::parse("./registry", Path::new("/work")).unwrap();
        assert_eq!(
            location,
            RegistryLocation::Local(PathBuf::from("/work/./registry"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_parse_file_url() {
        let location = RegistryLocation::parse("file:///srv/registry", Path::new("/")).unwrap();
        assert_eq!(location, RegistryLocation::Local(PathBuf::from("/srv/registry")));
    }

    #[test]
    fn test_registry_paths() {
        let descriptor = ComponentDescriptor::new("button", crate::manifest::ComponentKind::UiComponent);
        assert_eq!(
            component_path(Framework::Expo, &descriptor),
            "expo/components/button.tsx"
        );
        assert_eq!(
            utility_path(Framework::ReactNative, "modal-utils.ts"),
            "react-native/lib/modal-utils.ts"
        );
        assert_eq!(theme_path(Framework::Expo, "dark"), "expo/themes/dark.ts");
        assert_eq!(theme_index_path(Framework::Expo), "expo/themes/index.json");
    }

    #[test]
    fn test_theme_name_validation() {
        assert!(validate_theme_name("dark").is_ok());
        assert!(validate_theme_name("high-contrast").is_ok());
        assert!(validate_theme_name("../etc").is_err());
        assert!(validate_theme_name("Dark").is_err());
        assert!(validate_theme_name("").is_err());
    }
}
