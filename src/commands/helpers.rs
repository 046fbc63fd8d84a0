//! Command helper utilities

use std::path::{Path, PathBuf};

use console::Style;
use inquire::Confirm;
use normpath::{BasePathBuf, PathExt};

use crate::error::{ComponentryError, Result};
use crate::fileops::{FileOperation, FileOperationExecutor, OsFileSystem};
use crate::installer::{FileAction, InstallPlan, PackageManager};
use crate::project::Project;
use crate::registry::{DEFAULT_REGISTRY_URL, RegistryCache, RegistryLocation};

/// Resolve project path from optional argument
///
/// If a path is provided, use it. Otherwise, resolve to the current directory.
/// Existing paths are normalized so displayed paths have no `.` or `..`.
pub fn resolve_project_path(cwd: Option<PathBuf>) -> Result<PathBuf> {
    let path = match cwd {
        Some(path) => path,
        None => std::env::current_dir().map_err(|e| ComponentryError::Io {
            message: format!("Failed to get current directory: {}", e),
        })?,
    };
    Ok(path
        .normalize()
        .map(BasePathBuf::into_path_buf)
        .unwrap_or(path))
}

/// Open the registry named on the command line, or the public one
pub fn open_registry(registry: Option<&str>, base: &Path) -> Result<RegistryCache> {
    let location = RegistryLocation::parse(registry.unwrap_or(DEFAULT_REGISTRY_URL), base)?;
    tracing::debug!(?location, "using registry");
    Ok(RegistryCache::new(location.open()?))
}

/// Ask before writing; answers yes without a terminal
pub fn confirm(message: &str, skip: bool) -> Result<bool> {
    if skip || !console::user_attended() {
        return Ok(true);
    }

    let answer = Confirm::new(message)
        .with_default(true)
        .with_help_message("Press Enter to confirm, or 'n' to cancel")
        .prompt()?;
    Ok(answer)
}

/// Apply the plan's writes as one atomic batch
pub fn execute_plan(plan: &InstallPlan) -> Result<Vec<FileOperation>> {
    let mut executor = FileOperationExecutor::new(OsFileSystem);
    for op in plan.operations() {
        executor.plan_operation(op);
    }

    let result = executor.execute_operations(true);
    for message in &result.rollback_errors {
        eprintln!("{} {}", Style::new().yellow().bold().apply_to("warning:"), message);
    }
    result.into_result()
}

fn action_style(action: FileAction) -> Style {
    match action {
        FileAction::Create => Style::new().green(),
        FileAction::Update => Style::new().yellow(),
        FileAction::Skip | FileAction::Unchanged => Style::new().dim(),
    }
}

/// One line per planned file
pub fn print_plan(project: &Project, plan: &InstallPlan) {
    for file in &plan.files {
        println!(
            "  {:>9} {}",
            action_style(file.action).apply_to(file.action.as_str()),
            project.relative(&file.target).display()
        );
    }
}

/// Tell the user about files left alone because they already exist
pub fn print_skipped_hint(plan: &InstallPlan) {
    let skipped = plan.count(FileAction::Skip);
    if skipped > 0 {
        println!(
            "{} file(s) already exist with local changes and were skipped. Use {} to replace them.",
            skipped,
            Style::new().cyan().apply_to("--overwrite")
        );
    }
}

/// Print the npm packages the installed components need
pub fn print_external_dependencies(project: &Project, packages: &[String]) {
    if packages.is_empty() {
        return;
    }

    let manager = PackageManager::detect(project.root(), project.framework());
    println!();
    println!("{}", Style::new().bold().apply_to("Install the required packages:"));
    println!(
        "  {}",
        Style::new().cyan().apply_to(manager.install_command(packages))
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_project_path_explicit() {
        let path = PathBuf::from("/nonexistent/app");
        assert_eq!(resolve_project_path(Some(path.clone())).unwrap(), path);
    }

    #[test]
    fn test_resolve_project_path_defaults_to_cwd() {
        let cwd = std::env::current_dir().unwrap().normalize().unwrap();
        assert_eq!(resolve_project_path(None).unwrap(), cwd.into_path_buf());
    }

    #[test]
    fn test_confirm_skipped() {
        assert!(confirm("Proceed?", true).unwrap());
    }
}
