//! Validation of user-supplied names.

use std::sync::OnceLock;

use regex::Regex;

use forge_templates::to_snake_case;

use crate::error::{CoreError, CoreResult};

/// Names that collide with packages of the generated project.
pub const RESERVED_NAMES: &[&str] = &["app", "core", "db", "shared", "plugins", "tests"];

/// Lowest supported Python minor version (major is always 3).
pub const MIN_PYTHON_MINOR: u32 = 10;

fn module_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid module name pattern"))
}

/// Normalize an app name to snake_case and check it is a usable Python
/// package name.
pub fn validate_app_name(raw_name: &str) -> CoreResult<String> {
    let name = to_snake_case(raw_name.trim());

    if name.is_empty() {
        return Err(CoreError::InvalidName("App name cannot be empty".to_string()));
    }

    if !module_name_pattern().is_match(&name) {
        return Err(CoreError::InvalidName(format!(
            "'{}' must start with a letter and contain only lowercase letters, digits and underscores",
            name
        )));
    }

    if RESERVED_NAMES.contains(&name.as_str()) {
        return Err(CoreError::InvalidName(format!("'{}' is a reserved name", name)));
    }

    Ok(name)
}

/// Reject Python versions older than 3.10.
///
/// Versions that do not parse as `major.minor` are returned unchanged and
/// left for the package manager to judge.
pub fn validate_python_version(version: &str) -> CoreResult<String> {
    let version = version.trim();
    let mut parts = version.split('.');
    let major = parts.next().and_then(|p| p.parse::<u32>().ok());
    let minor = parts.next().and_then(|p| p.parse::<u32>().ok());

    if let (Some(major), Some(minor)) = (major, minor) {
        if major < 3 || (major == 3 && minor < MIN_PYTHON_MINOR) {
            return Err(CoreError::UnsupportedPython(format!(
                "{} (minimum is 3.{})",
                version, MIN_PYTHON_MINOR
            )));
        }
    }

    Ok(version.to_string())
}
