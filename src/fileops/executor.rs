//! Batch execution with snapshot-and-rollback

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ComponentryError, Result, file_operation};

use super::{BatchState, FileOperation, FileSystem, OperationBatch, OperationKind, OperationResult};

/// Plans file operations and applies them, all-or-nothing when atomic
#[derive(Debug)]
pub struct FileOperationExecutor<F: FileSystem> {
    fs: F,
    batch: OperationBatch,
    /// Directories this batch created, in creation order
    created_dirs: Vec<PathBuf>,
}

impl<F: FileSystem> FileOperationExecutor<F> {
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            batch: OperationBatch::new(),
            created_dirs: Vec::new(),
        }
    }

    /// Queue an operation; nothing touches the disk until execution
    pub fn plan_operation(&mut self, op: FileOperation) {
        debug!(operation = %op, "planned");
        self.batch.push(op);
    }

    /// Operations queued so far
    #[allow(dead_code)] // used in tests
    pub fn planned(&self) -> &[FileOperation] {
        self.batch.operations()
    }

    #[allow(dead_code)] // used in tests
    pub fn batch(&self) -> &OperationBatch {
        &self.batch
    }

    /// Apply every planned operation in order
    ///
    /// Stops at the first failure. With `atomic`, everything already applied
    /// is undone in reverse order before the result is returned.
    pub fn execute_operations(&mut self, atomic: bool) -> OperationResult {
        if self.batch.state != BatchState::Planned {
            return OperationResult {
                success: false,
                operations: self.batch.operations.clone(),
                error: Some(ComponentryError::Validation {
                    message: format!(
                        "operation batch cannot be executed again (state: {:?})",
                        self.batch.state
                    ),
                }),
                rollback_errors: Vec::new(),
            };
        }

        self.batch.state = BatchState::Executing;

        let mut applied = 0;
        let mut failure = None;
        for index in 0..self.batch.operations.len() {
            match self.apply(index) {
                Ok(()) => applied += 1,
                Err(err) => {
                    warn!(operation = %self.batch.operations[index], error = %err, "file operation failed");
                    failure = Some(err);
                    break;
                }
            }
        }

        let Some(err) = failure else {
            self.batch.state = BatchState::Committed;
            info!(operations = applied, "file operations committed");
            return OperationResult {
                success: true,
                operations: self.batch.operations.clone(),
                error: None,
                rollback_errors: Vec::new(),
            };
        };

        let rollback_errors = if atomic {
            let errors = self.rollback(applied);
            self.batch.state = BatchState::RolledBack;
            errors
        } else {
            self.batch.state = BatchState::Failed;
            Vec::new()
        };

        OperationResult {
            success: false,
            operations: self.batch.operations.clone(),
            error: Some(err),
            rollback_errors,
        }
    }

    /// Apply one operation, recording what is needed to undo it
    fn apply(&mut self, index: usize) -> Result<()> {
        let op = &self.batch.operations[index];
        let target = op.target.clone();
        let verb = op.verb();

        // Read everything first so a failure here leaves the target untouched.
        let new_content = match &op.kind {
            OperationKind::Create { content } | OperationKind::Update { content } => {
                content.clone().into_bytes()
            }
            OperationKind::Copy { source } => self
                .fs
                .read(source)
                .map_err(|e| file_operation(verb, source, e))?,
        };

        if self.fs.is_dir(&target) {
            return Err(file_operation(verb, &target, "target is a directory"));
        }

        let existed = self.fs.exists(&target);
        let backup = if existed {
            Some(
                self.fs
                    .read(&target)
                    .map_err(|e| file_operation(verb, &target, e))?,
            )
        } else {
            None
        };

        self.ensure_parent_dirs(&target)
            .map_err(|e| file_operation(verb, &target, e))?;

        self.fs
            .write(&target, &new_content)
            .map_err(|e| file_operation(verb, &target, e))?;

        let op = &mut self.batch.operations[index];
        op.existed = existed;
        op.backup = backup;
        debug!(operation = %op, existed, "applied");
        Ok(())
    }

    /// Create missing ancestors of `target`, shallowest first
    fn ensure_parent_dirs(&mut self, target: &Path) -> std::io::Result<()> {
        let Some(parent) = target.parent() else {
            return Ok(());
        };

        let missing: Vec<&Path> = parent
            .ancestors()
            .take_while(|dir| !dir.as_os_str().is_empty() && !self.fs.exists(dir))
            .collect();

        for dir in missing.into_iter().rev() {
            self.fs.create_dir(dir)?;
            self.created_dirs.push(dir.to_path_buf());
        }
        Ok(())
    }

    /// Undo the first `applied` operations, newest first
    fn rollback(&mut self, applied: usize) -> Vec<String> {
        let mut errors = Vec::new();

        for op in self.batch.operations[..applied].iter().rev() {
            let outcome = match (&op.backup, op.existed) {
                (Some(original), true) => self.fs.write(&op.target, original),
                _ => self.fs.remove_file(&op.target),
            };
            match outcome {
                Ok(()) => debug!(path = %op.target.display(), "rolled back"),
                Err(e) => {
                    let message = format!("failed to restore {}: {}", op.target.display(), e);
                    warn!("{message}");
                    errors.push(message);
                }
            }
        }

        // Deepest first, and only if nothing else lives there now
        for dir in self.created_dirs.iter().rev() {
            if !self.fs.is_empty_dir(dir) {
                continue;
            }
            if let Err(e) = self.fs.remove_dir(dir) {
                let message = format!("failed to remove directory {}: {}", dir.display(), e);
                warn!("{message}");
                errors.push(message);
            }
        }

        errors
    }
}
