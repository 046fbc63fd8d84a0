//! Componentry - copy-paste mobile UI components
//!
//! A command line tool that copies React Native and Expo components from a
//! registry into a project, resolving the components, utility files and
//! packages they depend on and writing everything in one atomic batch.

use clap::Parser;
use console::Style;
use miette::Diagnostic;

mod cli;
mod commands;
mod error;
mod fileops;
mod installer;
mod logging;
mod manifest;
mod progress;
mod project;
mod registry;
mod resolver;

use cli::{Cli, Commands};
use commands::GlobalOptions;
use error::ComponentryError;

/// Print an error with its help text and a retry hint when it may be transient
fn report(err: &ComponentryError) {
    eprintln!("{} {}", Style::new().red().bold().apply_to("Error:"), err);
    if let Some(help) = err.help() {
        eprintln!("  {} {}", Style::new().cyan().apply_to("help:"), help);
    }
    if err.is_retryable() {
        eprintln!(
            "  {}",
            Style::new()
                .dim()
                .apply_to("This may be temporary; run the command again to retry.")
        );
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let global = GlobalOptions {
        cwd: cli.cwd,
        registry: cli.registry,
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(&global, args),
        Commands::Add(args) => commands::add::run(&global, args),
        Commands::List(args) => commands::list::run(&global, args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        report(&e);
        std::process::exit(1);
    }
}
