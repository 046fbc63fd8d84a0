//! Registry served over HTTP(S)

use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

use crate::error::{ComponentryError, Result};
use crate::manifest::{ComponentDescriptor, Manifest};
use crate::project::Framework;

use super::RegistrySource;

/// Registry reachable at a base URL
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    base: Url,
    client: Client,
}

impl HttpRegistry {
    pub fn new(base: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("componentry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ComponentryError::Network {
                url: base.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { base, client })
    }

    /// Append a registry-relative path, preserving query parameters
    fn build_url(&self, relative: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ComponentryError::Validation {
                message: format!("Registry URL cannot have path segments: {}", self.base),
            })?
            .pop_if_empty()
            .extend(relative.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    fn get_text(&self, relative: &str) -> Result<String> {
        let url = self.build_url(relative)?;
        debug!(%url, "fetching");

        let network_error = |reason: String| ComponentryError::Network {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| network_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(format!("HTTP {status}")));
        }

        response.text().map_err(|e| network_error(e.to_string()))
    }
}

impl RegistrySource for HttpRegistry {
    fn fetch_manifest(&self) -> Result<Manifest> {
        let content = self.get_text(super::MANIFEST_FILE)?;
        Manifest::from_json(&content)
    }

    fn fetch_component_source(
        &self,
        framework: Framework,
        component: &ComponentDescriptor,
    ) -> Result<String> {
        self.get_text(&super::component_path(framework, component))
    }

    fn fetch_utility_file(&self, framework: Framework, path: &str) -> Result<String> {
        self.get_text(&super::utility_path(framework, path))
    }

    fn fetch_theme_source(&self, framework: Framework, theme: &str) -> Result<String> {
        self.get_text(&super::theme_path(framework, theme))
    }

    fn list_available_themes(&self, framework: Framework) -> Result<Vec<String>> {
        let url = self.build_url(&super::theme_index_path(framework))?;
        let content = self.get_text(&super::theme_index_path(framework))?;
        serde_json::from_str(&content).map_err(|e| ComponentryError::Network {
            url: url.to_string(),
            reason: format!("invalid theme index: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(base: &str) -> HttpRegistry {
        HttpRegistry::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_build_url_appends_segments() {
        let r = registry("https://example.com/registry");
        let url = r.build_url("expo/components/button.tsx").unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/registry/expo/components/button.tsx"
        );
    }

    #[test]
    fn test_build_url_trailing_slash() {
        let r = registry("https://example.com/registry/");
        let url = r.build_url("registry.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/registry/registry.json");
    }

    #[test]
    fn test_build_url_preserves_query() {
        let r = registry("https://example.com/r?ref=main");
        let url = r.build_url("registry.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/r/registry.json?ref=main");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let r = registry("http://127.0.0.1:9");
        let err = r.fetch_manifest().unwrap_err();
        assert!(matches!(err, ComponentryError::Network { .. }));
    }
}
