//! Planned file operations and atomic batch execution
//!
//! Installing a component touches several files. Operations are first
//! planned into an [`OperationBatch`] without touching the disk, then applied
//! in order by the [`FileOperationExecutor`]. When a batch runs atomically,
//! any failure rolls back everything the batch already did, so a project is
//! never left half-installed.
//!
//! ## Usage
//!
//! ```ignore
//! let mut executor = FileOperationExecutor::new(OsFileSystem);
//! executor.plan_operation(FileOperation::create(target, content));
//! executor.plan_operation(FileOperation::update(config_path, json));
//!
//! let result = executor.execute_operations(true);
//! let applied = result.into_result()?;
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::error::{ComponentryError, Result};

mod executor;
mod fs;

pub use executor::FileOperationExecutor;
pub use fs::{FileSystem, OsFileSystem};

/// What an operation does to its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    /// Write new content; overwrites (with backup) if the target exists
    Create { content: String },
    /// Copy bytes from another file on disk
    #[allow(dead_code)] // used in tests
    Copy { source: PathBuf },
    /// Replace the content of a file, usually one that already exists
    Update { content: String },
}

/// One pending filesystem mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOperation {
    pub kind: OperationKind,
    pub target: PathBuf,
    /// Previous content of `target`, captured during execution
    pub backup: Option<Vec<u8>>,
    /// Whether `target` existed when the operation was applied
    pub existed: bool,
}

impl FileOperation {
    fn new(kind: OperationKind, target: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            target: target.into(),
            backup: None,
            existed: false,
        }
    }

    pub fn create(target: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(
            OperationKind::Create {
                content: content.into(),
            },
            target,
        )
    }

    #[allow(dead_code)] // used in tests
    pub fn copy(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self::new(
            OperationKind::Copy {
                source: source.into(),
            },
            target,
        )
    }

    pub fn update(target: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self::new(
            OperationKind::Update {
                content: content.into(),
            },
            target,
        )
    }

    /// Short verb used in messages and errors
    pub fn verb(&self) -> &'static str {
        match self.kind {
            OperationKind::Create { .. } => "create",
            OperationKind::Copy { .. } => "copy",
            OperationKind::Update { .. } => "update",
        }
    }
}

impl fmt::Display for FileOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperationKind::Copy { source } => write!(
                f,
                "copy {} -> {}",
                source.display(),
                self.target.display()
            ),
            _ => write!(f, "{} {}", self.verb(), self.target.display()),
        }
    }
}

/// Lifecycle of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Accepting operations
    Planned,
    /// Operations are being applied
    Executing,
    /// Every operation succeeded
    Committed,
    /// An operation failed and earlier effects were undone
    RolledBack,
    /// An operation failed in a non-atomic batch; earlier effects remain
    Failed,
}

/// Ordered operations owned by one command invocation
#[derive(Debug, Clone)]
pub struct OperationBatch {
    operations: Vec<FileOperation>,
    state: BatchState,
}

impl OperationBatch {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            state: BatchState::Planned,
        }
    }

    pub fn push(&mut self, op: FileOperation) {
        self.operations.push(op);
    }

    #[allow(dead_code)] // used in tests
    pub fn operations(&self) -> &[FileOperation] {
        &self.operations
    }

    #[allow(dead_code)] // used in tests
    pub fn state(&self) -> BatchState {
        self.state
    }

    #[allow(dead_code)] // used in tests
    pub fn committed(&self) -> bool {
        self.state == BatchState::Committed
    }
}

impl Default for OperationBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of executing a batch
#[derive(Debug)]
pub struct OperationResult {
    pub success: bool,
    pub operations: Vec<FileOperation>,
    /// The failure that stopped the batch
    pub error: Option<ComponentryError>,
    /// Problems hit while undoing a failed batch; never replace `error`
    pub rollback_errors: Vec<String>,
}

impl OperationResult {
    /// Convert into a `Result`, keeping the primary error on failure
    pub fn into_result(self) -> Result<Vec<FileOperation>> {
        match self.error {
            Some(err) => Err(err),
            None if self.success => Ok(self.operations),
            None => Err(ComponentryError::Validation {
                message: "file operations failed without a recorded error".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests;
