//! File operation executor tests

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::io;
use std::path::Path;

use tempfile::TempDir;

use super::*;

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Real filesystem that refuses to write or remove chosen paths
struct FailingFs {
    fail_writes: RefCell<Vec<PathBuf>>,
    fail_removes: Vec<PathBuf>,
}

impl FailingFs {
    fn new() -> Self {
        Self {
            fail_writes: RefCell::new(Vec::new()),
            fail_removes: Vec::new(),
        }
    }
}

impl FileSystem for FailingFs {
    fn exists(&self, path: &Path) -> bool {
        OsFileSystem.exists(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        OsFileSystem.is_dir(path)
    }
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        OsFileSystem.read(path)
    }
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.fail_writes.borrow().iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ));
        }
        OsFileSystem.write(path, contents)
    }
    fn remove_file(&self, path: &Path) -> io::Result<()> {
        if self.fail_removes.iter().any(|p| p == path) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "busy"));
        }
        OsFileSystem.remove_file(path)
    }
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        OsFileSystem.create_dir(path)
    }
    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        OsFileSystem.remove_dir(path)
    }
    fn is_empty_dir(&self, path: &Path) -> bool {
        OsFileSystem.is_empty_dir(path)
    }
}

#[test]
fn test_planning_has_no_side_effects() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("components/ui/button.tsx");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&target, "export {}"));

    assert_eq!(executor.planned().len(), 1);
    assert_eq!(executor.batch().state(), BatchState::Planned);
    assert!(!target.exists());
    assert!(!temp.path().join("components").exists());
}

#[test]
fn test_two_copies_succeed() {
    let temp = TempDir::new().unwrap();
    let src_a = temp.path().join("registry/a.tsx");
    let src_b = temp.path().join("registry/b.tsx");
    std::fs::create_dir_all(temp.path().join("registry")).unwrap();
    std::fs::write(&src_a, "export const A = 1;").unwrap();
    std::fs::write(&src_b, "export const B = 2;").unwrap();

    let dst_a = temp.path().join("out/a.tsx");
    let dst_b = temp.path().join("out/nested/b.tsx");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::copy(&src_a, &dst_a));
    executor.plan_operation(FileOperation::copy(&src_b, &dst_b));

    let result = executor.execute_operations(true);

    assert!(result.success);
    assert!(result.error.is_none());
    assert_eq!(result.operations.len(), 2);
    assert_eq!(read(&dst_a), "export const A = 1;");
    assert_eq!(read(&dst_b), "export const B = 2;");
    assert!(executor.batch().committed());
}

#[test]
fn test_atomic_rollback_restores_update_and_creates_nothing() {
    let temp = TempDir::new().unwrap();
    let existing = temp.path().join("existing.ts");
    std::fs::write(&existing, "old").unwrap();
    let missing_source = temp.path().join("missing.tsx");
    let target = temp.path().join("target.tsx");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::update(&existing, "new"));
    executor.plan_operation(FileOperation::copy(&missing_source, &target));

    let result = executor.execute_operations(true);

    assert!(!result.success);
    assert!(matches!(
        result.error,
        Some(ComponentryError::FileOperation { ref operation, .. }) if operation == "copy"
    ));
    assert!(result.rollback_errors.is_empty());
    assert_eq!(read(&existing), "old");
    assert!(!target.exists());
    assert_eq!(executor.batch().state(), BatchState::RolledBack);
    assert!(!executor.batch().committed());
}

#[test]
fn test_update_captures_backup() {
    let temp = TempDir::new().unwrap();
    let existing = temp.path().join("theme.ts");
    std::fs::write(&existing, "before").unwrap();

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::update(&existing, "after"));
    let ops = executor.execute_operations(true).into_result().unwrap();

    assert!(ops[0].existed);
    assert_eq!(ops[0].backup.as_deref(), Some(b"before".as_slice()));
    assert_eq!(read(&existing), "after");
}

#[test]
fn test_create_without_existing_file_has_no_backup() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("new.ts");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&target, "x"));
    let ops = executor.execute_operations(true).into_result().unwrap();

    assert!(!ops[0].existed);
    assert!(ops[0].backup.is_none());
}

#[test]
fn test_rollback_restores_overwritten_create() {
    let temp = TempDir::new().unwrap();
    let existing = temp.path().join("button.tsx");
    std::fs::write(&existing, "user edits").unwrap();

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&existing, "registry version"));
    executor.plan_operation(FileOperation::copy(temp.path().join("nope"), temp.path().join("x")));

    let result = executor.execute_operations(true);
    assert!(!result.success);
    assert_eq!(read(&existing), "user edits");
}

#[test]
fn test_rollback_removes_created_directories() {
    let temp = TempDir::new().unwrap();
    let deep = temp.path().join("components/ui/forms/input.tsx");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&deep, "input"));
    executor.plan_operation(FileOperation::copy(temp.path().join("missing"), temp.path().join("y")));

    let result = executor.execute_operations(true);

    assert!(!result.success);
    assert!(!deep.exists());
    assert!(!temp.path().join("components").exists());
}

#[test]
fn test_rollback_leaves_preexisting_directories() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("lib/a.ts");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&first, "a"));
    executor.plan_operation(FileOperation::copy(temp.path().join("missing"), temp.path().join("z")));

    std::fs::create_dir_all(temp.path().join("lib")).unwrap();
    std::fs::write(temp.path().join("lib/user.ts"), "mine").unwrap();

    let result = executor.execute_operations(true);
    assert!(!result.success);
    assert!(!first.exists());
    assert_eq!(read(&temp.path().join("lib/user.ts")), "mine");
}

#[test]
fn test_stops_at_first_failure() {
    let temp = TempDir::new().unwrap();
    let after = temp.path().join("after.ts");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::copy(temp.path().join("missing"), temp.path().join("t")));
    executor.plan_operation(FileOperation::create(&after, "never"));

    let result = executor.execute_operations(false);
    assert!(!result.success);
    assert!(!after.exists());
}

#[test]
fn test_non_atomic_failure_keeps_applied_operations() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first.ts");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&first, "kept"));
    executor.plan_operation(FileOperation::copy(temp.path().join("missing"), temp.path().join("t")));

    let result = executor.execute_operations(false);

    assert!(!result.success);
    assert!(result.error.is_some());
    assert_eq!(read(&first), "kept");
    assert_eq!(executor.batch().state(), BatchState::Failed);
}

#[test]
fn test_target_directory_is_an_error() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("dir")).unwrap();

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(temp.path().join("dir"), "x"));
    let result = executor.execute_operations(true);

    assert!(!result.success);
    assert!(temp.path().join("dir").is_dir());
}

#[test]
fn test_write_failure_rolls_back_earlier_operations() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("a.ts");
    let blocked = temp.path().join("b.ts");

    let fs = FailingFs::new();
    fs.fail_writes.borrow_mut().push(blocked.clone());

    let mut executor = FileOperationExecutor::new(fs);
    executor.plan_operation(FileOperation::create(&first, "a"));
    executor.plan_operation(FileOperation::create(&blocked, "b"));

    let result = executor.execute_operations(true);

    assert!(!result.success);
    match result.error {
        Some(ComponentryError::FileOperation { path, cause, .. }) => {
            assert!(path.ends_with("b.ts"));
            assert!(cause.contains("permission denied"));
        }
        other => panic!("Expected FileOperation error, got {other:?}"),
    }
    assert!(!first.exists());
    assert!(!blocked.exists());
}

#[test]
fn test_rollback_failure_is_reported_without_masking_primary_error() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("stuck.ts");

    let mut fs = FailingFs::new();
    fs.fail_removes.push(first.clone());

    let mut executor = FileOperationExecutor::new(fs);
    executor.plan_operation(FileOperation::create(&first, "a"));
    executor.plan_operation(FileOperation::copy(temp.path().join("missing"), temp.path().join("t")));

    let result = executor.execute_operations(true);

    assert!(!result.success);
    assert!(matches!(
        result.error,
        Some(ComponentryError::FileOperation { ref operation, .. }) if operation == "copy"
    ));
    assert_eq!(result.rollback_errors.len(), 1);
    assert!(result.rollback_errors[0].contains("stuck.ts"));
    assert!(matches!(
        result.into_result(),
        Err(ComponentryError::FileOperation { .. })
    ));
}

#[test]
fn test_batch_executes_only_once() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("once.ts");

    let mut executor = FileOperationExecutor::new(OsFileSystem);
    executor.plan_operation(FileOperation::create(&target, "1"));
    assert!(executor.execute_operations(true).success);

    std::fs::write(&target, "changed by user").unwrap();
    let second = executor.execute_operations(true);

    assert!(!second.success);
    assert!(matches!(
        second.error,
        Some(ComponentryError::Validation { .. })
    ));
    assert_eq!(read(&target), "changed by user");
}

#[test]
fn test_empty_batch_commits() {
    let mut executor = FileOperationExecutor::new(OsFileSystem);
    let result = executor.execute_operations(true);
    assert!(result.success);
    assert!(executor.batch().committed());
}

#[test]
fn test_operation_display() {
    let op = FileOperation::copy("a/src.tsx", "b/dst.tsx");
    assert_eq!(op.to_string(), "copy a/src.tsx -> b/dst.tsx");
    assert_eq!(FileOperation::update("c.ts", "").to_string(), "update c.ts");
}
