//! List-apps command - Show app modules and their registration state.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use forge_core::{list_apps, AppListing};

use super::{locate_project, CommandContext};

#[derive(Args)]
pub struct ListAppsArgs {
    /// Show the module files of each app
    #[arg(short, long)]
    pub files: bool,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

pub fn execute(args: ListAppsArgs, _context: &CommandContext) -> Result<()> {
    let layout = locate_project(args.path.as_deref())?;
    let listing = list_apps(&layout)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    print!("{}", render(&listing, args.files));
    Ok(())
}

fn render(listing: &AppListing, show_files: bool) -> String {
    let mut out = String::new();

    if listing.apps.is_empty() {
        out.push_str("No apps found in app/apps/\n");
    } else {
        out.push_str(&format!("Apps ({}):\n", listing.apps.len()));
        for app in &listing.apps {
            let state = if app.registered {
                "✓ registered"
            } else {
                "✗ not registered"
            };
            out.push_str(&format!("  {:<24} {}\n", app.name, state));
            if show_files {
                for file in &app.files {
                    out.push_str(&format!("      {}\n", file));
                }
            }
        }
    }

    if !listing.registry_found {
        out.push_str("\n! INSTALLED_APPS could not be read from app/core/registry.py\n");
    }

    if !listing.missing.is_empty() {
        out.push_str("\nRegistered but missing:\n");
        for name in &listing.missing {
            out.push_str(&format!("  ✗ {}\n", name));
        }
    }

    out
}
