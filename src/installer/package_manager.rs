//! Package manager detection for the post-install hint

use std::fmt;
use std::path::Path;

use crate::project::Framework;

/// How the user installs npm packages in this project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Bun,
    Pnpm,
    Yarn,
    /// `npx expo install` picks versions compatible with the Expo SDK
    ExpoCli,
    Npm,
}

impl PackageManager {
    /// Pick the manager from the lock file present in `root`
    pub fn detect(root: &Path, framework: Framework) -> Self {
        if root.join("bun.lockb").exists() || root.join("bun.lock").exists() {
            Self::Bun
        } else if root.join("pnpm-lock.yaml").exists() {
            Self::Pnpm
        } else if root.join("yarn.lock").exists() {
            Self::Yarn
        } else if framework == Framework::Expo {
            Self::ExpoCli
        } else {
            Self::Npm
        }
    }

    fn command(self) -> &'static str {
        match self {
            Self::Bun => "bun add",
            Self::Pnpm => "pnpm add",
            Self::Yarn => "yarn add",
            Self::ExpoCli => "npx expo install",
            Self::Npm => "npm install",
        }
    }

    /// Full command line installing `packages`
    pub fn install_command(self, packages: &[String]) -> String {
        format!("{} {}", self.command(), packages.join(" "))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_files_win_over_framework() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("yarn.lock"), "").unwrap();
        assert_eq!(
            PackageManager::detect(temp.path(), Framework::Expo),
            PackageManager::Yarn
        );

        std::fs::write(temp.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(
            PackageManager::detect(temp.path(), Framework::Expo),
            PackageManager::Pnpm
        );

        std::fs::write(temp.path().join("bun.lock"), "").unwrap();
        assert_eq!(
            PackageManager::detect(temp.path(), Framework::ReactNative),
            PackageManager::Bun
        );
    }

    #[test]
    fn test_fallback_by_framework() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            PackageManager::detect(temp.path(), Framework::Expo),
            PackageManager::ExpoCli
        );
        assert_eq!(
            PackageManager::detect(temp.path(), Framework::ReactNative),
            PackageManager::Npm
        );
    }

    #[test]
    fn test_install_command() {
        let packages = vec!["react-native-reanimated".to_string(), "clsx".to_string()];
        assert_eq!(
            PackageManager::ExpoCli.install_command(&packages),
            "npx expo install react-native-reanimated clsx"
        );
    }
}
