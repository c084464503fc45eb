//! Fixed project layout of a generated FastAPI project.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CoreError, CoreResult};

/// Number of parent directories searched above the starting point.
pub const MAX_PARENT_SEARCH: usize = 3;

/// Directories every project must contain.
pub const REQUIRED_DIRS: &[&str] = &["app", "app/core", "app/apps", "app/db"];

/// Core modules every project must contain.
pub const REQUIRED_CORE_FILES: &[&str] = &[
    "app/core/config.py",
    "app/core/registry.py",
    "app/core/database.py",
];

/// Core modules that are reported when missing but not required.
pub const OPTIONAL_CORE_FILES: &[&str] = &["app/core/security.py", "app/core/container.py"];

/// Database modules every project must contain.
pub const REQUIRED_DB_FILES: &[&str] = &["app/db/base.py", "app/db/session.py"];

/// Files inspected per app by `list-apps --files`.
pub const APP_MODULE_FILES: &[&str] = &[
    "models.py",
    "schemas.py",
    "services.py",
    "repositories.py",
    "routes.py",
    "dependencies.py",
];

/// Name of the registry list in `app/core/registry.py`.
pub const INSTALLED_APPS: &str = "INSTALLED_APPS";

/// Paths of a project rooted at a directory containing `app/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate the project containing `start`.
    pub fn locate(start: &Path) -> CoreResult<Self> {
        find_project_root(start).map(Self::new)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root.join("app")
    }

    pub fn apps_dir(&self) -> PathBuf {
        self.app_dir().join("apps")
    }

    pub fn app_path(&self, name: &str) -> PathBuf {
        self.apps_dir().join(name)
    }

    pub fn core_dir(&self) -> PathBuf {
        self.app_dir().join("core")
    }

    pub fn config_file(&self) -> PathBuf {
        self.core_dir().join("config.py")
    }

    pub fn registry_file(&self) -> PathBuf {
        self.core_dir().join("registry.py")
    }

    pub fn main_file(&self) -> PathBuf {
        self.app_dir().join("main.py")
    }

    pub fn env_file(&self) -> PathBuf {
        self.root.join(".env")
    }

    pub fn env_example_file(&self) -> PathBuf {
        self.root.join(".env.example")
    }

    /// Resolve a `/`-separated path relative to the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

/// Find the nearest directory containing `app/`, looking at `start` and up
/// to [`MAX_PARENT_SEARCH`] of its parents.
pub fn find_project_root(start: &Path) -> CoreResult<PathBuf> {
    for candidate in start.ancestors().take(MAX_PARENT_SEARCH + 1) {
        if candidate.join("app").is_dir() {
            debug!("Project root: {:?}", candidate);
            return Ok(candidate.to_path_buf());
        }
    }
    Err(CoreError::ProjectNotFound(start.to_path_buf()))
}
