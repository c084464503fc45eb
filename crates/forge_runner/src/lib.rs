//! # forge_runner
//!
//! Package manager execution wrapper for forge.
//!
//! Dependency installation is delegated to an external tool (`uv` by default)
//! behind the [`PackageManager`] trait, so generation logic can be exercised
//! with a mock and the real tool only runs from the CLI.
//!
//! # Example
//!
//! ```rust,no_run
//! use forge_runner::{PackageManager, RunnerOptions, UvRunner};
//! use std::path::Path;
//!
//! let uv = UvRunner::new(RunnerOptions::default());
//! if uv.is_available() {
//!     uv.add(Path::new("./my-api"), &["fastapi[standard]".to_string()]).unwrap();
//! }
//! ```

pub mod error;
pub mod manager;
pub mod uv;

pub use error::{RunnerError, RunnerResult};
pub use manager::{CommandOutput, PackageManager};
pub use uv::{RunnerOptions, UvRunner};
