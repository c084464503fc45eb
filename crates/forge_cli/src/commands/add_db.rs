//! Add-db command - Switch the database engine of the current project.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use forge_core::{add_database, CoreError, DatabaseEngine};
use forge_runner::PackageManager;

use super::{locate_project, CommandContext};

#[derive(Args)]
pub struct AddDbArgs {
    /// Database engine (postgres, mysql, sqlite, mongodb)
    pub engine: DatabaseEngine,

    /// Install the engine's driver packages
    #[arg(long)]
    pub install: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

pub fn execute(args: AddDbArgs, context: &CommandContext) -> Result<()> {
    let layout = locate_project(args.path.as_deref())?;
    let engine = args.engine;

    let change = add_database(layout.root(), engine)?;

    println!("✓ Database engine set to {}", engine.display_name());
    if change.config_updated {
        println!("  Updated app/core/config.py");
    } else {
        println!("! DATABASE_ENGINE not found in app/core/config.py");
    }
    if change.env_updated {
        println!("  Updated .env");
    }

    let packages: Vec<String> = engine.dependencies().iter().map(|p| p.to_string()).collect();

    if args.install {
        let runner = context.package_manager();
        if !runner.is_available() {
            return Err(CoreError::ToolNotAvailable(runner.name().to_string()).into());
        }
        info!("Installing {} driver packages", engine.display_name());
        runner
            .add(layout.root(), &packages)
            .map_err(CoreError::from)
            .context("Failed to install database drivers")?;
        println!("✓ Installed {}", packages.join(", "));
    } else {
        println!();
        println!("Install the drivers with:");
        println!("  uv add {}", packages.join(" "));
    }

    println!();
    println!("Set DATABASE_URL in .env, for example:");
    println!("  DATABASE_URL={}", engine.url_example());

    Ok(())
}
