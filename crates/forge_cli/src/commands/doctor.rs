//! Doctor command - Check the current project for problems.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use forge_core::{run_doctor, DoctorReport};

use super::{locate_project, CommandContext};

#[derive(Args)]
pub struct DoctorArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,
}

pub fn execute(args: DoctorArgs, _context: &CommandContext) -> Result<()> {
    let layout = locate_project(args.path.as_deref())?;
    info!("Checking project at {:?}", layout.root());

    let report = run_doctor(&layout);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render(&report));
    }

    if !report.is_healthy() {
        anyhow::bail!(
            "Project validation failed with {} error(s)",
            report.errors()
        );
    }

    Ok(())
}

fn render(report: &DoctorReport) -> String {
    let mut out = String::new();

    for section in &report.sections {
        out.push_str(&format!("{}\n", section.title));
        for check in &section.checks {
            out.push_str(&format!("  {} {}\n", check.status.symbol(), check.message));
        }
        out.push('\n');
    }

    if report.is_healthy() && report.warnings() == 0 {
        out.push_str("✓ All checks passed!\n");
    } else {
        out.push_str(&format!(
            "{} error(s), {} warning(s)\n",
            report.errors(),
            report.warnings()
        ));
    }

    out
}
