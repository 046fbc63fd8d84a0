//! Error types and handling for Componentry
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every variant maps to one failure class of the install pipeline:
//! - registry knowledge ([`ComponentryError::ComponentNotFound`],
//!   [`ComponentryError::ThemeNotFound`], [`ComponentryError::CycleDetected`],
//!   [`ComponentryError::ManifestInvalid`])
//! - registry reachability ([`ComponentryError::Network`])
//! - the user's project ([`ComponentryError::InvalidProject`],
//!   [`ComponentryError::ProjectLocked`], [`ComponentryError::Validation`])
//! - file system mutation ([`ComponentryError::FileOperation`],
//!   [`ComponentryError::Io`])

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Componentry operations
#[derive(Error, Diagnostic, Debug)]
pub enum ComponentryError {
    // Registry knowledge errors
    #[error("Component '{name}' not found in the registry")]
    #[diagnostic(
        code(componentry::registry::component_not_found),
        help("Available components: {available}")
    )]
    ComponentNotFound { name: String, available: String },

    #[error("Theme '{name}' not found in the registry")]
    #[diagnostic(
        code(componentry::registry::theme_not_found),
        help("Available themes: {available}")
    )]
    ThemeNotFound { name: String, available: String },

    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    #[diagnostic(
        code(componentry::registry::cycle),
        help("The registry manifest is inconsistent; report this to the registry maintainers")
    )]
    CycleDetected { cycle: Vec<String> },

    #[error("Invalid registry manifest: {reason}")]
    #[diagnostic(code(componentry::registry::manifest_invalid))]
    ManifestInvalid { reason: String },

    // Registry reachability
    #[error("Failed to fetch {url}: {reason}")]
    #[diagnostic(
        code(componentry::registry::network),
        help("Check your network connection or the --registry value")
    )]
    Network { url: String, reason: String },

    // Project errors
    #[error("Invalid project: {reason}")]
    #[diagnostic(
        code(componentry::project::invalid),
        help("Run this command from the root of a React Native or Expo project, or run 'componentry init' first")
    )]
    InvalidProject { reason: String },

    #[error("Project is locked by another componentry process: {path}")]
    #[diagnostic(
        code(componentry::project::locked),
        help("Wait for the other process to finish, or remove the stale lock file")
    )]
    ProjectLocked { path: String },

    #[error("{message}")]
    #[diagnostic(code(componentry::validation))]
    Validation { message: String },

    // File system errors
    #[error("File operation '{operation}' failed for {path}: {cause}")]
    #[diagnostic(
        code(componentry::fs::operation_failed),
        help("No files were changed. Fix the underlying condition (permissions, disk space) and re-run")
    )]
    FileOperation {
        operation: String,
        path: String,
        cause: String,
    },

    #[error("IO error: {message}")]
    #[diagnostic(code(componentry::fs::io_error))]
    Io { message: String },
}

impl ComponentryError {
    /// Whether re-running the same command can succeed once the environment changes
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ComponentryError::Network { .. }
                | ComponentryError::FileOperation { .. }
                | ComponentryError::ProjectLocked { .. }
                | ComponentryError::Io { .. }
        )
    }
}

/// Build a `ComponentNotFound` error listing the names the registry does know
pub fn component_not_found<I, S>(name: impl Into<String>, available: I) -> ComponentryError
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ComponentryError::ComponentNotFound {
        name: name.into(),
        available: join_names(available),
    }
}

/// Build a `ThemeNotFound` error listing the available themes
pub fn theme_not_found<I, S>(name: impl Into<String>, available: I) -> ComponentryError
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ComponentryError::ThemeNotFound {
        name: name.into(),
        available: join_names(available),
    }
}

/// Wrap an I/O failure of a file operation
pub fn file_operation(
    operation: impl Into<String>,
    path: &Path,
    cause: impl std::fmt::Display,
) -> ComponentryError {
    ComponentryError::FileOperation {
        operation: operation.into(),
        path: path.display().to_string(),
        cause: cause.to_string(),
    }
}

/// Build a `Validation` error
pub fn validation(message: impl Into<String>) -> ComponentryError {
    ComponentryError::Validation {
        message: message.into(),
    }
}

/// Build an `InvalidProject` error
pub fn invalid_project(reason: impl Into<String>) -> ComponentryError {
    ComponentryError::InvalidProject {
        reason: reason.into(),
    }
}

fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}

impl From<std::io::Error> for ComponentryError {
    fn from(err: std::io::Error) -> Self {
        ComponentryError::Io {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for ComponentryError {
    fn from(err: inquire::InquireError) -> Self {
        ComponentryError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ComponentryError>;

#[cfg(test)]
mod tests;
