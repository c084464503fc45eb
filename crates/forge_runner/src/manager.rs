//! Package manager trait and types.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RunnerResult;

/// Output captured from one package manager invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandOutput {
    /// Exit code, `-1` when terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stderr if present, else stdout, else a placeholder.
    pub fn details(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        "No details available".to_string()
    }
}

/// Operations the scaffolder needs from a Python package manager.
///
/// Calls block until the underlying process exits.
pub trait PackageManager {
    /// Executable name, used in messages.
    fn name(&self) -> &str;

    /// Whether the executable can be launched.
    fn is_available(&self) -> bool;

    /// Create a bare project in `project_dir` pinned to `python`.
    fn init(&self, project_dir: &Path, python: &str) -> RunnerResult<()>;

    /// Add dependencies to the project in `project_dir`.
    fn add(&self, project_dir: &Path, packages: &[String]) -> RunnerResult<()>;

    /// Render the locked dependency set as a `requirements.txt` body.
    fn export_requirements(&self, project_dir: &Path) -> RunnerResult<String>;
}
