//! Project health checks.
//!
//! Each section inspects one aspect of a generated project and records
//! [`CheckResult`]s. Only [`CheckStatus::Error`] makes the report fail.

use std::fs;

use serde::Serialize;
use tracing::debug;

use forge_templates::env_value;

use crate::apps::installed_apps;
use crate::layout::{
    ProjectLayout, INSTALLED_APPS, OPTIONAL_CORE_FILES, REQUIRED_CORE_FILES, REQUIRED_DB_FILES,
    REQUIRED_DIRS,
};

/// Placeholder secrets shipped in generated `.env` files.
pub const DEFAULT_SECRET_KEYS: &[&str] = &[
    "change-in-production",
    "change-this-in-production",
    "your-secret-key",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Warning => "!",
            Self::Error => "✗",
        }
    }
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Ok,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Error,
            message: message.into(),
        }
    }
}

/// Titled group of checks.
#[derive(Debug, Clone, Serialize)]
pub struct CheckSection {
    pub title: String,
    pub checks: Vec<CheckResult>,
}

impl CheckSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            checks: Vec::new(),
        }
    }

    fn push(&mut self, check: CheckResult) {
        self.checks.push(check);
    }
}

/// Full doctor report.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub sections: Vec<CheckSection>,
}

impl DoctorReport {
    fn count(&self, status: CheckStatus) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.checks)
            .filter(|c| c.status == status)
            .count()
    }

    pub fn errors(&self) -> usize {
        self.count(CheckStatus::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(CheckStatus::Warning)
    }

    /// `true` when no required check failed.
    pub fn is_healthy(&self) -> bool {
        self.errors() == 0
    }

    pub fn section(&self, title: &str) -> Option<&CheckSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// Run every check against the project at `layout`.
pub fn run_doctor(layout: &ProjectLayout) -> DoctorReport {
    let report = DoctorReport {
        sections: vec![
            check_structure(layout),
            check_core_files(layout),
            check_database_files(layout),
            check_apps(layout),
            check_environment(layout),
            check_main(layout),
        ],
    };
    debug!(
        "Doctor finished: {} error(s), {} warning(s)",
        report.errors(),
        report.warnings()
    );
    report
}

fn check_structure(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Project structure");
    for dir in REQUIRED_DIRS {
        if layout.resolve(dir).is_dir() {
            section.push(CheckResult::ok(format!("{}/ exists", dir)));
        } else {
            section.push(CheckResult::error(format!("{}/ is missing", dir)));
        }
    }
    section
}

fn check_core_files(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Core files");
    for file in REQUIRED_CORE_FILES {
        if layout.resolve(file).is_file() {
            section.push(CheckResult::ok(format!("{} exists", file)));
        } else {
            section.push(CheckResult::error(format!("{} is missing", file)));
        }
    }
    for file in OPTIONAL_CORE_FILES {
        if layout.resolve(file).is_file() {
            section.push(CheckResult::ok(format!("{} exists", file)));
        } else {
            section.push(CheckResult::warning(format!("{} is missing (optional)", file)));
        }
    }
    section
}

fn check_database_files(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Database");
    for file in REQUIRED_DB_FILES {
        if layout.resolve(file).is_file() {
            section.push(CheckResult::ok(format!("{} exists", file)));
        } else {
            section.push(CheckResult::error(format!("{} is missing", file)));
        }
    }
    section
}

fn check_apps(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Installed apps");

    let Some(apps) = installed_apps(&layout.registry_file()) else {
        section.push(CheckResult::warning(format!(
            "Could not read {} from app/core/registry.py",
            INSTALLED_APPS
        )));
        return section;
    };

    if apps.is_empty() {
        section.push(CheckResult::ok("No apps registered"));
    }

    for app in apps {
        let dir = layout.app_path(&app);
        if !dir.is_dir() {
            section.push(CheckResult::error(format!(
                "'{}' is registered but app/apps/{}/ does not exist",
                app, app
            )));
        } else if !dir.join("routes.py").is_file() {
            section.push(CheckResult::error(format!(
                "'{}' has no routes.py",
                app
            )));
        } else {
            section.push(CheckResult::ok(format!("'{}' is installed", app)));
        }
    }
    section
}

fn check_environment(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Environment");

    let env_path = layout.env_file();
    let content = match fs::read_to_string(&env_path) {
        Ok(content) => content,
        Err(_) => {
            let hint = if layout.env_example_file().is_file() {
                " (copy .env.example to .env)"
            } else {
                ""
            };
            section.push(CheckResult::error(format!(".env is missing{}", hint)));
            return section;
        }
    };
    section.push(CheckResult::ok(".env exists"));

    match env_value(&content, "DATABASE_URL") {
        Some(url) if !url.trim().is_empty() => {
            section.push(CheckResult::ok("DATABASE_URL is set"));
        }
        _ => section.push(CheckResult::error("DATABASE_URL is not set")),
    }

    match env_value(&content, "SECRET_KEY").map(str::trim) {
        Some(secret) if DEFAULT_SECRET_KEYS.contains(&secret) => {
            section.push(CheckResult::warning("SECRET_KEY still has its default value"));
        }
        Some(secret) if !secret.is_empty() => {
            section.push(CheckResult::ok("SECRET_KEY is set"));
        }
        _ => section.push(CheckResult::warning("SECRET_KEY is not set")),
    }
    section
}

fn check_main(layout: &ProjectLayout) -> CheckSection {
    let mut section = CheckSection::new("Application");

    let Ok(content) = fs::read_to_string(layout.main_file()) else {
        section.push(CheckResult::error("app/main.py is missing"));
        return section;
    };

    if !content.contains("FastAPI") {
        section.push(CheckResult::error("app/main.py does not import FastAPI"));
    } else if !(content.contains("app = ") || content.contains("app=")) {
        section.push(CheckResult::error("app/main.py does not create an app instance"));
    } else {
        section.push(CheckResult::ok("app/main.py creates a FastAPI app"));
    }
    section
}
