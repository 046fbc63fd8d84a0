//! `componentry.json` project configuration

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ComponentryError, Result, invalid_project};

use super::{CONFIG_FILE, Framework, ProjectDescriptor};

/// JSON schema advertised in written config files
pub const SCHEMA_URL: &str = "https://componentry.dev/schema.json";

/// How rewritten imports refer to installed files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    #[default]
    Alias,
    Relative,
}

/// The alias groups a component may import from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    Components,
    Hooks,
    Lib,
    Utils,
    Styles,
}

impl AliasKind {
    pub const ALL: [AliasKind; 5] = [
        AliasKind::Components,
        AliasKind::Hooks,
        AliasKind::Lib,
        AliasKind::Utils,
        AliasKind::Styles,
    ];

    /// Alias the registry's own sources are written against
    pub fn canonical(self) -> &'static str {
        match self {
            Self::Components => "@/components/ui",
            Self::Hooks => "@/hooks",
            Self::Lib => "@/lib",
            Self::Utils => "@/lib/utils",
            Self::Styles => "@/theme",
        }
    }
}

/// Import aliases, as configured in the project's bundler/tsconfig
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Aliases {
    pub components: String,
    pub hooks: String,
    pub lib: String,
    pub utils: String,
    pub styles: String,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            components: AliasKind::Components.canonical().to_string(),
            hooks: AliasKind::Hooks.canonical().to_string(),
            lib: AliasKind::Lib.canonical().to_string(),
            utils: AliasKind::Utils.canonical().to_string(),
            styles: AliasKind::Styles.canonical().to_string(),
        }
    }
}

impl Aliases {
    pub fn get(&self, kind: AliasKind) -> &str {
        match kind {
            AliasKind::Components => &self.components,
            AliasKind::Hooks => &self.hooks,
            AliasKind::Lib => &self.lib,
            AliasKind::Utils => &self.utils,
            AliasKind::Styles => &self.styles,
        }
    }
}

/// Install directories, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dirs {
    pub components: String,
    pub hooks: String,
    pub lib: String,
    pub theme: String,
}

impl Default for Dirs {
    fn default() -> Self {
        Self {
            components: "components/ui".to_string(),
            hooks: "hooks".to_string(),
            lib: "lib".to_string(),
            theme: "theme".to_string(),
        }
    }
}

impl Dirs {
    fn with_prefix(prefix: &str) -> Self {
        let base = Self::default();
        Self {
            components: format!("{prefix}/{}", base.components),
            hooks: format!("{prefix}/{}", base.hooks),
            lib: format!("{prefix}/{}", base.lib),
            theme: format!("{prefix}/{}", base.theme),
        }
    }

    /// Directory an alias group points at (`utils` is a module inside `lib`)
    pub fn for_alias(&self, kind: AliasKind) -> String {
        match kind {
            AliasKind::Components => self.components.clone(),
            AliasKind::Hooks => self.hooks.clone(),
            AliasKind::Lib => self.lib.clone(),
            AliasKind::Utils => format!("{}/utils", self.lib),
            AliasKind::Styles => self.theme.clone(),
        }
    }
}

/// Persisted project settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(rename = "$schema", default = "default_schema")]
    pub schema: String,
    pub framework: Framework,
    #[serde(default)]
    pub import_style: ImportStyle,
    #[serde(default)]
    pub aliases: Aliases,
    #[serde(default)]
    pub dirs: Dirs,
}

fn default_schema() -> String {
    SCHEMA_URL.to_string()
}

impl ProjectConfig {
    /// Defaults for a freshly detected project
    pub fn create_default_config(descriptor: &ProjectDescriptor) -> Self {
        Self {
            schema: default_schema(),
            framework: descriptor.framework,
            import_style: ImportStyle::default(),
            aliases: Aliases::default(),
            dirs: if descriptor.src_dir {
                Dirs::with_prefix("src")
            } else {
                Dirs::default()
            },
        }
    }

    /// Read `componentry.json` from the project root
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => invalid_project(format!(
                "{CONFIG_FILE} not found in {}. Run `componentry init` first.",
                root.display()
            )),
            _ => ComponentryError::Io {
                message: format!("Failed to read {}: {e}", path.display()),
            },
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ComponentryError::Validation {
            message: format!("Invalid {CONFIG_FILE}: {e}"),
        })
    }

    /// Pretty JSON with a trailing newline, as written to disk
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).map_err(|e| ComponentryError::Validation {
                message: format!("Failed to serialize {CONFIG_FILE}: {e}"),
            })?;
        json.push('\n');
        Ok(json)
    }

    /// Directory a bare `@/` import points at
    pub fn source_root(&self) -> &str {
        if self.dirs.components.starts_with("src/") {
            "src"
        } else {
            ""
        }
    }
}
