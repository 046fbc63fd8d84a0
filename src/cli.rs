//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::project::Framework;
use crate::registry::REGISTRY_ENV;

/// Componentry - copy-paste mobile UI components
///
/// Add React Native and Expo components to your project as source files you own.
#[derive(Parser, Debug)]
#[command(
    name = "componentry",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Copy-paste UI components for React Native and Expo",
    long_about = "Componentry copies UI components from a registry into your React Native or \
                  Expo project, together with the components, hooks and utility files they \
                  depend on. The copied files are yours to edit.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  componentry init\n    \
                  componentry add component button dialog\n    \
                  componentry add theme dark\n    \
                  componentry list component\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://componentry.dev/docs"
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'C', global = true)]
    pub cwd: Option<PathBuf>,

    /// Registry URL or local registry directory
    #[arg(long, global = true, env = REGISTRY_ENV)]
    pub registry: Option<String>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up componentry in a project
    Init(InitArgs),

    /// Add components or themes to the project
    Add(AddArgs),

    /// List what the registry offers
    List(ListArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Initialize the current project:\n    componentry init\n\n\
                  Initialize another directory:\n    componentry init ./apps/mobile\n\n\
                  Start from the dark theme:\n    componentry init --theme dark\n\n\
                  Re-create an existing config:\n    componentry init --force")]
pub struct InitArgs {
    /// Project directory to initialize (defaults to --cwd or the current directory)
    pub target: Option<PathBuf>,

    /// Overwrite an existing componentry.json and theme files
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Base theme to install
    #[arg(long, default_value = "default")]
    pub theme: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the add command
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(subcommand)]
    pub target: AddTarget,
}

#[derive(Subcommand, Debug)]
pub enum AddTarget {
    /// Add components and everything they depend on
    Component(AddComponentArgs),

    /// Add a theme and regenerate the theme index
    Theme(AddThemeArgs),
}

/// Arguments for `add component`
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Add a component:\n    componentry add component button\n\n\
                  Add several without confirmation:\n    componentry add component dialog card -y\n\n\
                  Replace local copies with the registry version:\n    componentry add component button --overwrite\n\n\
                  Show what would be written:\n    componentry add component dialog --dry-run")]
pub struct AddComponentArgs {
    /// Component names
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Replace existing files whose content differs
    #[arg(long, short = 'o')]
    pub overwrite: bool,

    /// Print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `add theme`
#[derive(Args, Debug)]
pub struct AddThemeArgs {
    /// Theme name
    pub name: String,

    /// Replace the theme file if it already exists
    #[arg(long, short = 'o')]
    pub overwrite: bool,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(subcommand)]
    pub target: ListTarget,
}

#[derive(Subcommand, Debug)]
pub enum ListTarget {
    /// List available components
    Component,

    /// List available themes
    Theme(ListThemeArgs),
}

/// Arguments for `list theme`
#[derive(Args, Debug)]
pub struct ListThemeArgs {
    /// Framework to list themes for (defaults to the project's)
    #[arg(long)]
    pub framework: Option<Framework>,
}

/// Arguments for completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
