//! CLI command definitions.
//!
//! Each subcommand maps to one project operation in `forge_core`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use forge_core::ProjectLayout;
use forge_runner::{RunnerOptions, UvRunner};
use forge_templates::TemplateLibrary;

pub mod add_db;
pub mod create_app;
pub mod doctor;
pub mod list_apps;
pub mod new;

/// forge - FastAPI project scaffolding
#[derive(Parser)]
#[command(name = "forge")]
#[command(version, about = "forge - FastAPI project scaffolding")]
#[command(long_about = r#"
forge generates FastAPI projects and keeps their app registry in sync.

COMMANDS:
  new          → Create a new project from the project templates
  create-app   → Add an app module under app/apps and register it
  list-apps    → Show app directories and their registration state
  add-db       → Switch the configured database engine
  doctor       → Check a project for missing structure and settings

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or project not found
  3 - Validation failure
  4 - Template error
  5 - Toolchain error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Template library directory
    #[arg(long, global = true, env = "FORGE_TEMPLATES")]
    pub templates: Option<PathBuf>,

    /// Print package manager commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new FastAPI project
    New(new::NewArgs),

    /// Create an app module in the current project
    #[command(name = "create-app")]
    CreateApp(create_app::CreateAppArgs),

    /// List app modules and their registration state
    #[command(name = "list-apps")]
    ListApps(list_apps::ListAppsArgs),

    /// Switch the database engine of the current project
    #[command(name = "add-db")]
    AddDb(add_db::AddDbArgs),

    /// Check the current project for problems
    Doctor(doctor::DoctorArgs),
}

/// Settings shared by every command.
pub struct CommandContext {
    pub library: TemplateLibrary,
    pub dry_run: bool,
}

impl CommandContext {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            library: TemplateLibrary::discover(cli.templates.as_deref()),
            dry_run: cli.dry_run,
        }
    }

    pub fn package_manager(&self) -> UvRunner {
        let options = RunnerOptions::new();
        UvRunner::new(if self.dry_run { options.dry_run() } else { options })
    }
}

/// Locate the project containing `path`, or the working directory.
pub fn locate_project(path: Option<&Path>) -> Result<ProjectLayout> {
    let start = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("Failed to read working directory")?,
    };
    Ok(ProjectLayout::locate(&start)?)
}

/// `path` relative to `base` for display, or unchanged when outside it.
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
