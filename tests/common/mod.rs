//! Common test utilities for componentry integration tests

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A temporary app directory for integration tests
pub struct TestProject {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    /// Create an empty directory with no package.json
    pub fn empty() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create an Expo app with TypeScript
    pub fn expo() -> Self {
        let project = Self::empty();
        project.write_file(
            "package.json",
            r#"{
  "name": "demo-app",
  "dependencies": {
    "expo": "~51.0.0",
    "react": "18.2.0",
    "react-native": "0.74.1"
  }
}
"#,
        );
        project.write_file("app.json", r#"{ "expo": { "name": "demo-app" } }"#);
        project.write_file("tsconfig.json", "{}\n");
        project
    }

    /// Create a bare React Native app with an android/ directory
    pub fn react_native() -> Self {
        let project = Self::empty();
        project.write_file(
            "package.json",
            r#"{ "name": "bare-app", "dependencies": { "react-native": "0.74.1" } }"#,
        );
        std::fs::create_dir_all(project.path.join("android"))
            .expect("Failed to create android directory");
        project
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Copy the fixture registry into this temp dir so a test can modify it
    pub fn copy_fixture_registry(&self) -> PathBuf {
        let target = self.temp.path().join("registry-copy");
        copy_dir_recursive(&fixture_registry(), &target).expect("Failed to copy registry");
        target
    }

    /// Command running in this project against the fixture registry
    pub fn cmd(&self) -> Command {
        let mut cmd = componentry_cmd();
        cmd.current_dir(&self.path)
            .arg("--registry")
            .arg(fixture_registry());
        cmd
    }

    /// Run `init --yes` and assert success
    pub fn init(&self) {
        self.cmd().args(["init", "--yes"]).assert().success();
    }
}

/// Path to the fixture registry
pub fn fixture_registry() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("common")
        .join("fixtures")
        .join("registry")
}

/// The componentry binary with a clean environment
#[allow(deprecated)]
pub fn componentry_cmd() -> Command {
    let mut cmd = Command::cargo_bin("componentry").unwrap();
    // Always ignore any developer overrides during tests
    cmd.env_remove("COMPONENTRY_REGISTRY");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Copy a directory tree
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
