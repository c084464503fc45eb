//! Create-app command - Add an app module to the current project.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use super::{display_path, locate_project, CommandContext};

#[derive(Args)]
pub struct CreateAppArgs {
    /// Name of the app to create
    pub name: String,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

pub fn execute(args: CreateAppArgs, context: &CommandContext) -> Result<()> {
    let layout = locate_project(args.path.as_deref())?;
    info!("Creating app '{}' in {:?}", args.name, layout.root());

    let created = forge_core::create_app(&layout, &context.library, &args.name)?;

    println!("✓ App '{}' created successfully!", created.name);
    println!();
    for file in &created.files {
        println!("  {}", display_path(file, layout.root()));
    }
    println!();

    if created.registered {
        println!("Registered in app/core/registry.py");
    } else {
        warn!("INSTALLED_APPS not found, app was not registered");
        println!(
            "! Add \"{}\" to INSTALLED_APPS in app/core/registry.py manually",
            created.name
        );
    }

    Ok(())
}
