//! Project detection and structure checks

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, invalid_project};

use super::CONFIG_FILE;

/// Mobile framework the project is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Expo,
    ReactNative,
}

impl Framework {
    /// Directory name used in the registry layout
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expo => "expo",
            Self::ReactNative => "react-native",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "expo" => Ok(Self::Expo),
            "react-native" => Ok(Self::ReactNative),
            other => Err(format!(
                "unknown framework '{other}' (expected expo or react-native)"
            )),
        }
    }
}

/// What was found at a project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub root: PathBuf,
    pub framework: Framework,
    pub typescript: bool,
    pub has_config: bool,
    pub src_dir: bool,
}

/// Inspect `root` and work out which framework it uses
pub fn detect_project(root: &Path) -> Result<ProjectDescriptor> {
    let package_json = root.join("package.json");
    let content = std::fs::read_to_string(&package_json).map_err(|_| {
        invalid_project(format!(
            "No package.json found in {}. Run this command from your app's root directory.",
            root.display()
        ))
    })?;
    let package: Value = serde_json::from_str(&content)
        .map_err(|e| invalid_project(format!("package.json is not valid JSON: {e}")))?;

    let framework = if has_dependency(&package, "expo") || app_json_declares_expo(root) {
        Framework::Expo
    } else if has_dependency(&package, "react-native") {
        Framework::ReactNative
    } else {
        return Err(invalid_project(
            "Neither expo nor react-native is a dependency in package.json",
        ));
    };

    let descriptor = ProjectDescriptor {
        root: root.to_path_buf(),
        framework,
        typescript: root.join("tsconfig.json").is_file(),
        has_config: root.join(CONFIG_FILE).is_file(),
        src_dir: root.join("src").is_dir(),
    };
    debug!(?descriptor, "project detected");
    Ok(descriptor)
}

/// Check the files each framework needs to be present
pub fn validate_project_structure(framework: Framework, root: &Path) -> Result<()> {
    match framework {
        Framework::ReactNative => {
            if root.join("ios").is_dir() || root.join("android").is_dir() {
                Ok(())
            } else {
                Err(invalid_project(
                    "React Native project has neither an ios/ nor an android/ directory",
                ))
            }
        }
        Framework::Expo => {
            let found = ["app.json", "app.config.js", "app.config.ts"]
                .iter()
                .any(|name| root.join(name).is_file());
            if found {
                Ok(())
            } else {
                Err(invalid_project(
                    "Expo project has no app.json, app.config.js or app.config.ts",
                ))
            }
        }
    }
}

fn has_dependency(package: &Value, name: &str) -> bool {
    ["dependencies", "devDependencies", "peerDependencies"]
        .iter()
        .filter_map(|section| package.get(section))
        .any(|deps| deps.get(name).is_some())
}

fn app_json_declares_expo(root: &Path) -> bool {
    std::fs::read_to_string(root.join("app.json"))
        .ok()
        .and_then(|content| serde_json::from_str::<Value>(&content).ok())
        .is_some_and(|app| app.get("expo").is_some())
}
