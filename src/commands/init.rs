//! Init command implementation
//!
//! Detects the framework, writes `componentry.json`, and installs the base
//! theme with its index. All three land in a single atomic batch.

use console::Style;
use tracing::info;

use crate::cli::InitArgs;
use crate::commands::GlobalOptions;
use crate::commands::helpers;
use crate::error::{Result, validation};
use crate::installer::{InstallPlan, Installer, plan_config};
use crate::project::{
    CONFIG_FILE, Framework, Project, ProjectConfig, detect_project, validate_project_structure,
};

/// Run init command
pub fn run(global: &GlobalOptions, args: InitArgs) -> Result<()> {
    let base = helpers::resolve_project_path(global.cwd.clone())?;
    let root = match args.target {
        Some(target) => base.join(target),
        None => base,
    };

    let descriptor = detect_project(&root)?;
    validate_project_structure(descriptor.framework, &root)?;

    if descriptor.has_config && !args.force {
        return Err(validation(format!(
            "{CONFIG_FILE} already exists in {}. Use --force to overwrite it.",
            root.display()
        )));
    }

    let project = Project::new(&root, ProjectConfig::create_default_config(&descriptor));
    let _guard = project.lock()?;

    println!(
        "Detected {} project{}",
        Style::new().bold().apply_to(framework_label(descriptor.framework)),
        if descriptor.typescript {
            " (TypeScript)"
        } else {
            ""
        }
    );

    let registry = helpers::open_registry(global.registry.as_deref(), &root)?;
    let mut plan = InstallPlan {
        files: vec![plan_config(&project)?],
        ..Default::default()
    };
    plan.extend(
        Installer::new(&project, &registry)
            .overwrite(args.force)
            .plan_theme(&args.theme)?,
    );

    println!();
    helpers::print_plan(&project, &plan);
    println!();

    if !plan.has_changes() {
        println!("Project is already initialized.");
        return Ok(());
    }

    if !helpers::confirm("Write these files?", args.yes)? {
        println!("Cancelled.");
        return Ok(());
    }

    let written = helpers::execute_plan(&plan)?;
    info!(files = written.len(), root = %root.display(), "project initialized");

    println!(
        "{} Initialized componentry with the {} theme.",
        Style::new().green().bold().apply_to("✓"),
        Style::new().cyan().apply_to(&args.theme)
    );
    helpers::print_skipped_hint(&plan);
    println!();
    println!("Add your first component:");
    println!(
        "  {}",
        Style::new().cyan().apply_to("componentry add component button")
    );

    Ok(())
}

fn framework_label(framework: Framework) -> &'static str {
    match framework {
        Framework::Expo => "Expo",
        Framework::ReactNative => "React Native",
    }
}
