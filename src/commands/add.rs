//! Add command implementation
//!
//! `add component` resolves the requested components against the registry
//! manifest, fetches everything they need and writes it in one atomic
//! batch. `add theme` installs a theme and regenerates the theme index.

use console::Style;
use tracing::info;

use crate::cli::{AddArgs, AddComponentArgs, AddTarget, AddThemeArgs};
use crate::commands::GlobalOptions;
use crate::commands::helpers;
use crate::error::Result;
use crate::installer::{FileAction, Installer};
use crate::project::Project;
use crate::resolver::Resolver;

/// Run add command
pub fn run(global: &GlobalOptions, args: AddArgs) -> Result<()> {
    match args.target {
        AddTarget::Component(args) => add_components(global, args),
        AddTarget::Theme(args) => add_theme(global, args),
    }
}

fn add_components(global: &GlobalOptions, args: AddComponentArgs) -> Result<()> {
    let root = helpers::resolve_project_path(global.cwd.clone())?;
    let project = Project::open(&root)?;
    // A dry run never writes, so it doesn't need the lock
    let _guard = if args.dry_run {
        None
    } else {
        Some(project.lock()?)
    };

    let registry = helpers::open_registry(global.registry.as_deref(), &root)?;
    let resolver = Resolver::new(registry.manifest()?);
    let resolution = resolver.resolve(&args.names)?;

    let dependencies: Vec<&str> = resolution
        .names()
        .iter()
        .filter(|name| !args.names.contains(*name))
        .map(String::as_str)
        .collect();
    if !dependencies.is_empty() {
        println!(
            "Also adding dependencies: {}",
            Style::new().cyan().apply_to(dependencies.join(", "))
        );
    }

    let plan = Installer::new(&project, &registry)
        .overwrite(args.overwrite)
        .show_progress(!args.yes && console::user_attended_stderr())
        .plan_components(&resolver, &resolution)?;

    println!();
    helpers::print_plan(&project, &plan);
    println!();

    if args.dry_run {
        println!("Dry run: no files were written.");
        helpers::print_external_dependencies(&project, &plan.external_dependencies);
        return Ok(());
    }

    if !plan.has_changes() {
        println!("Nothing to write.");
        helpers::print_skipped_hint(&plan);
        helpers::print_external_dependencies(&project, &plan.external_dependencies);
        return Ok(());
    }

    let pending = plan.count(FileAction::Create) + plan.count(FileAction::Update);
    if !helpers::confirm(&format!("Write {pending} file(s)?"), args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let written = helpers::execute_plan(&plan)?;
    info!(files = written.len(), components = ?plan.components, "components added");

    println!(
        "{} Added {}",
        Style::new().green().bold().apply_to("✓"),
        plan.components.join(", ")
    );
    helpers::print_skipped_hint(&plan);
    helpers::print_external_dependencies(&project, &plan.external_dependencies);

    Ok(())
}

fn add_theme(global: &GlobalOptions, args: AddThemeArgs) -> Result<()> {
    let root = helpers::resolve_project_path(global.cwd.clone())?;
    let project = Project::open(&root)?;
    let _guard = project.lock()?;

    let registry = helpers::open_registry(global.registry.as_deref(), &root)?;
    let plan = Installer::new(&project, &registry)
        .overwrite(args.overwrite)
        .plan_theme(&args.name)?;

    helpers::print_plan(&project, &plan);

    if plan.has_changes() {
        let written = helpers::execute_plan(&plan)?;
        info!(files = written.len(), theme = %args.name, "theme added");
    }

    let theme_file = plan.files.first().map(|f| f.action);
    match theme_file {
        Some(FileAction::Skip) => helpers::print_skipped_hint(&plan),
        Some(FileAction::Unchanged) => {
            println!("Theme {} is already up to date.", args.name);
        }
        _ => println!(
            "{} Added theme {}",
            Style::new().green().bold().apply_to("✓"),
            Style::new().cyan().apply_to(&args.name)
        ),
    }

    Ok(())
}
