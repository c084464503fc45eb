//! `uv`-backed package manager.
//!
//! Commands run synchronously in the project directory with output captured.
//! Dry-run mode logs the command line and reports success without spawning.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{RunnerError, RunnerResult};
use crate::manager::{CommandOutput, PackageManager};

/// Runner options.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Executable to invoke
    pub program: String,
    /// Print commands without executing
    pub dry_run: bool,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            program: "uv".to_string(),
            dry_run: false,
        }
    }
}

impl RunnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

/// Package manager driving the `uv` CLI.
pub struct UvRunner {
    options: RunnerOptions,
}

impl Default for UvRunner {
    fn default() -> Self {
        Self::new(RunnerOptions::default())
    }
}

impl UvRunner {
    pub fn new(options: RunnerOptions) -> Self {
        Self { options }
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn init_args(python: &str) -> Vec<String> {
        ["init", "--bare", "--no-workspace", "--python", python]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn add_args(packages: &[String]) -> Vec<String> {
        let mut args = vec!["add".to_string()];
        args.extend(packages.iter().cloned());
        args
    }

    pub fn export_args() -> Vec<String> {
        [
            "export",
            "--format",
            "requirements-txt",
            "--no-hashes",
            "--no-header",
            "--no-annotate",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Format command for logging.
    fn format_command(&self, args: &[String]) -> String {
        let mut cmd = self.options.program.clone();
        for arg in args {
            if arg.contains(' ') || arg.contains('[') {
                cmd.push_str(&format!(" '{}'", arg));
            } else {
                cmd.push_str(&format!(" {}", arg));
            }
        }
        cmd
    }

    /// Run the program with `args` inside `cwd`, failing on non-zero exit.
    fn run(&self, cwd: &Path, args: &[String]) -> RunnerResult<CommandOutput> {
        let command_line = self.format_command(args);

        if self.options.dry_run {
            info!("[dry-run] {}", command_line);
            return Ok(CommandOutput::default());
        }

        debug!("Executing in {:?}: {}", cwd, command_line);

        let output = Command::new(&self.options.program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RunnerError::Spawn {
                tool: self.options.program.clone(),
                source,
            })?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !result.success() {
            return Err(RunnerError::CommandFailed {
                command: command_line,
                stderr: result.details(),
            });
        }

        Ok(result)
    }
}

impl PackageManager for UvRunner {
    fn name(&self) -> &str {
        &self.options.program
    }

    fn is_available(&self) -> bool {
        if self.options.dry_run {
            return true;
        }
        Command::new(&self.options.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn init(&self, project_dir: &Path, python: &str) -> RunnerResult<()> {
        std::fs::create_dir_all(project_dir)?;
        self.run(project_dir, &Self::init_args(python))?;
        Ok(())
    }

    fn add(&self, project_dir: &Path, packages: &[String]) -> RunnerResult<()> {
        if packages.is_empty() {
            return Ok(());
        }
        self.run(project_dir, &Self::add_args(packages))?;
        Ok(())
    }

    fn export_requirements(&self, project_dir: &Path) -> RunnerResult<String> {
        Ok(self.run(project_dir, &Self::export_args())?.stdout)
    }
}
