//! Error types for the core module.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Could not find project root (no app/ directory) from {0:?}")]
    ProjectNotFound(PathBuf),

    #[error("Directory '{0}' already exists")]
    AlreadyExists(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Unsupported Python version: {0}")]
    UnsupportedPython(String),

    #[error("Unknown database engine: '{0}'")]
    UnknownEngine(String),

    #[error("Required directory not found: {0}")]
    MissingDirectory(String),

    #[error("{0} is required but was not found on PATH")]
    ToolNotAvailable(String),

    #[error("Template error: {0}")]
    Template(#[from] forge_templates::TemplateError),

    #[error("Package manager error: {0}")]
    Runner(#[from] forge_runner::RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
