//! # forge_core
//!
//! Project generation and maintenance operations for forge.
//!
//! # Operations
//!
//! - **Generator**: creates a new FastAPI project from the project templates
//! - **Apps**: creates, registers and lists app modules under `app/apps/`
//! - **Database**: switches the configured database engine
//! - **Doctor**: checks a project for missing structure and settings
//!
//! # Example
//!
//! ```rust,ignore
//! use forge_core::{create_app, ProjectLayout};
//! use forge_templates::TemplateLibrary;
//!
//! let layout = ProjectLayout::locate(&std::env::current_dir()?)?;
//! let library = TemplateLibrary::discover(None);
//! let created = create_app(&layout, &library, "orders")?;
//! println!("Created {} file(s)", created.files.len());
//! ```

pub mod apps;
pub mod config;
pub mod database;
pub mod doctor;
pub mod error;
pub mod generator;
pub mod layout;
pub mod naming;

pub use apps::{
    app_directories, create_app, installed_apps, list_apps, register_app, AppInfo, AppListing,
    CreatedApp,
};
pub use config::{Linter, Orm, ProjectConfig, ProjectDefaults, Structure, DEFAULTS_FILE, DEFAULT_PYTHON};
pub use database::{add_database, update_config_engine, update_env_file, DatabaseChange, DatabaseEngine};
pub use doctor::{run_doctor, CheckResult, CheckSection, CheckStatus, DoctorReport};
pub use error::{CoreError, CoreResult};
pub use generator::{GeneratedProject, ProjectGenerator, REQUIREMENTS_FILE};
pub use layout::{find_project_root, ProjectLayout};
pub use naming::{validate_app_name, validate_python_version, RESERVED_NAMES};
