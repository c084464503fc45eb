//! forge CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or project not found
//! - 3: Validation failure
//! - 4: Template error
//! - 5: Toolchain error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forge_core::CoreError;

mod commands;

use commands::{Cli, Commands, CommandContext};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const TOOLCHAIN_ERROR: u8 = 5;
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet, cli.log_json);

    let context = CommandContext::from_cli(&cli);

    let result = match cli.command {
        Commands::New(args) => commands::new::execute(args, &context),
        Commands::CreateApp(args) => commands::create_app::execute(args, &context),
        Commands::ListApps(args) => commands::list_apps::execute(args, &context),
        Commands::AddDb(args) => commands::add_db::execute(args, &context),
        Commands::Doctor(args) => commands::doctor::execute(args, &context),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("✗ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging(verbose: bool, quiet: bool, json: bool) {
    let default_directives = if verbose {
        "forge=debug,info"
    } else if quiet {
        "error"
    } else {
        "forge=info,warn"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let registry = tracing_subscriber::registry().with(filter);
    let log_result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(core) = e.downcast_ref::<CoreError>() {
        return match core {
            CoreError::ProjectNotFound(_)
            | CoreError::AlreadyExists(_)
            | CoreError::InvalidName(_)
            | CoreError::UnsupportedPython(_)
            | CoreError::UnknownEngine(_)
            | CoreError::MissingDirectory(_) => ExitCodes::INVALID_ARGS,
            CoreError::Template(_) => ExitCodes::TEMPLATE_ERROR,
            CoreError::ToolNotAvailable(_) | CoreError::Runner(_) => ExitCodes::TOOLCHAIN_ERROR,
            CoreError::Io(_) | CoreError::Yaml(_) => ExitCodes::GENERAL_ERROR,
        };
    }

    let msg = e.to_string().to_lowercase();

    if msg.contains("validation") {
        ExitCodes::VALIDATION_FAILURE
    } else if msg.contains("template") {
        ExitCodes::TEMPLATE_ERROR
    } else if msg.contains("uv ") || msg.contains("package manager") {
        ExitCodes::TOOLCHAIN_ERROR
    } else if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
