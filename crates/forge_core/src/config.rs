//! Project generation settings.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::DatabaseEngine;
use crate::error::CoreResult;

/// File holding optional project defaults in the working directory.
pub const DEFAULTS_FILE: &str = "forge.yaml";

/// Python version used when none is configured.
pub const DEFAULT_PYTHON: &str = "3.10";

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $id:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }

            pub fn id(&self) -> &'static str {
                match self {
                    $(Self::$variant => $id),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.id())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($id => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($name).to_lowercase(),
                        other,
                        [$($id),+].join(", ")
                    )),
                }
            }
        }
    };
}

choice_enum! {
    /// Directory structure of a generated project.
    Structure { Simple => "simple", Advanced => "advanced" } default Simple
}

choice_enum! {
    /// ORM dependency of a generated project.
    Orm { Sqlmodel => "sqlmodel", Sqlalchemy => "sqlalchemy", None => "none" } default Sqlmodel
}

choice_enum! {
    /// Linting toolchain of a generated project.
    Linter { Ruff => "ruff", Classic => "classic", None => "none" } default Ruff
}

impl Orm {
    pub fn package(&self) -> Option<&'static str> {
        match self {
            Self::Sqlmodel => Some("sqlmodel"),
            Self::Sqlalchemy => Some("sqlalchemy"),
            Self::None => None,
        }
    }
}

impl Linter {
    pub fn packages(&self) -> &'static [&'static str] {
        match self {
            Self::Ruff => &["ruff"],
            Self::Classic => &["black", "isort", "flake8"],
            Self::None => &[],
        }
    }
}

/// Defaults read from `forge.yaml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectDefaults {
    pub structure: Option<Structure>,
    pub orm: Option<Orm>,
    pub linter: Option<Linter>,
    pub database: Option<DatabaseEngine>,
    pub python: Option<String>,
    pub tests: Option<bool>,
    pub views: Option<bool>,
    pub install: Option<bool>,
}

impl ProjectDefaults {
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load `forge.yaml` from `dir`, or empty defaults when the file is absent.
    pub fn load(dir: &Path) -> CoreResult<Self> {
        let path = dir.join(DEFAULTS_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        debug!("Loading project defaults from {:?}", path);
        Self::from_yaml(&fs::read_to_string(path)?)
    }
}

/// Everything needed to generate one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name as typed
    pub name: String,
    /// Directory the project is generated into
    pub path: PathBuf,
    /// Generate into an existing directory (no name given)
    pub in_place: bool,
    pub structure: Structure,
    pub orm: Orm,
    pub linter: Linter,
    pub database: DatabaseEngine,
    pub python: String,
    pub tests: bool,
    pub views: bool,
    /// Run the package manager after generation
    pub install: bool,
}

impl ProjectConfig {
    /// Config for a project named `name` created under `parent`.
    pub fn new(name: impl Into<String>, parent: &Path) -> Self {
        let name = name.into();
        Self {
            path: parent.join(&name),
            name,
            in_place: false,
            structure: Structure::default(),
            orm: Orm::default(),
            linter: Linter::default(),
            database: DatabaseEngine::default(),
            python: DEFAULT_PYTHON.to_string(),
            tests: false,
            views: false,
            install: true,
        }
    }

    /// Config that initialises the existing directory `dir`, named after it.
    pub fn in_place(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "app".to_string());
        Self {
            path: dir.to_path_buf(),
            in_place: true,
            ..Self::new(name, dir)
        }
    }

    /// Apply values from `forge.yaml`.
    pub fn with_defaults(mut self, defaults: &ProjectDefaults) -> Self {
        if let Some(structure) = defaults.structure {
            self.structure = structure;
        }
        if let Some(orm) = defaults.orm {
            self.orm = orm;
        }
        if let Some(linter) = defaults.linter {
            self.linter = linter;
        }
        if let Some(database) = defaults.database {
            self.database = database;
        }
        if let Some(python) = &defaults.python {
            self.python = python.clone();
        }
        if let Some(tests) = defaults.tests {
            self.tests = tests;
        }
        if let Some(views) = defaults.views {
            self.views = views;
        }
        if let Some(install) = defaults.install {
            self.install = install;
        }
        self
    }

    /// Packages installed into the generated project, in install order.
    pub fn dependencies(&self) -> Vec<String> {
        let mut deps = vec!["fastapi[standard]", "python-dotenv"];
        deps.extend(self.orm.package());
        if self.views {
            deps.push("jinja2");
        }
        if self.tests {
            deps.extend(["pytest", "httpx"]);
        }
        deps.extend(self.linter.packages());
        deps.extend(self.database.dependencies());

        let mut unique: Vec<String> = Vec::with_capacity(deps.len());
        for dep in deps {
            if !unique.iter().any(|d| d == dep) {
                unique.push(dep.to_string());
            }
        }
        unique
    }
}
