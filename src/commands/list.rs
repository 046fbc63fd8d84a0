//! List command implementation
//!
//! Read-only enumeration of what the registry offers. An empty registry is
//! not an error; an unreachable one is.

use console::Style;

use crate::cli::{ListArgs, ListTarget, ListThemeArgs};
use crate::commands::GlobalOptions;
use crate::commands::helpers;
use crate::error::{Result, validation};
use crate::installer::theme::installed_themes;
use crate::project::{Framework, Project, detect_project};
use crate::registry::RegistrySource;

/// Run list command
pub fn run(global: &GlobalOptions, args: ListArgs) -> Result<()> {
    match args.target {
        ListTarget::Component => list_components(global),
        ListTarget::Theme(args) => list_themes(global, args),
    }
}

fn list_components(global: &GlobalOptions) -> Result<()> {
    let root = helpers::resolve_project_path(global.cwd.clone())?;
    let registry = helpers::open_registry(global.registry.as_deref(), &root)?;
    let manifest = registry.manifest()?;

    if manifest.is_empty() {
        println!("No components available in the registry.");
        return Ok(());
    }

    println!("Available components ({}):", manifest.len());
    println!();

    let width = manifest.names().map(str::len).max().unwrap_or(0);
    for component in manifest.components() {
        let name = format!("{:width$}", component.name);
        match &component.description {
            Some(description) => println!(
                "  {}  {}  {}",
                Style::new().bold().yellow().apply_to(name),
                Style::new().dim().apply_to(component.kind.as_str()),
                description
            ),
            None => println!(
                "  {}  {}",
                Style::new().bold().yellow().apply_to(name),
                Style::new().dim().apply_to(component.kind.as_str())
            ),
        }
    }

    Ok(())
}

fn list_themes(global: &GlobalOptions, args: ListThemeArgs) -> Result<()> {
    let root = helpers::resolve_project_path(global.cwd.clone())?;
    let project = Project::open(&root).ok();

    let framework = match (args.framework, &project) {
        (Some(framework), _) => framework,
        (None, Some(project)) => project.framework(),
        (None, None) => detect_framework(&root)?,
    };

    let registry = helpers::open_registry(global.registry.as_deref(), &root)?;
    let themes = registry.list_available_themes(framework)?;

    if themes.is_empty() {
        println!("No themes available for {framework}.");
        return Ok(());
    }

    let installed = project
        .as_ref()
        .map(|p| installed_themes(&p.theme_dir()))
        .unwrap_or_default();

    println!("Available themes for {framework} ({}):", themes.len());
    println!();
    for theme in &themes {
        if installed.contains(theme) {
            println!(
                "  {} {}",
                Style::new().bold().yellow().apply_to(theme),
                Style::new().green().apply_to("(installed)")
            );
        } else {
            println!("  {}", Style::new().bold().yellow().apply_to(theme));
        }
    }

    Ok(())
}

/// Framework of an uninitialized project, for `list theme` outside a config
fn detect_framework(root: &std::path::Path) -> Result<Framework> {
    detect_project(root)
        .map(|descriptor| descriptor.framework)
        .map_err(|_| {
            validation("Could not determine the framework. Pass --framework expo or --framework react-native.")
        })
}
