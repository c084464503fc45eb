//! App modules under `app/apps/`: creation, registration and listing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use forge_templates::{
    add_list_entry, list_entries, module_context, TemplateExpander, TemplateKind, TemplateLibrary,
};

use crate::error::{CoreError, CoreResult};
use crate::layout::{ProjectLayout, APP_MODULE_FILES, INSTALLED_APPS};
use crate::naming::validate_app_name;

/// Result of `create_app`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedApp {
    /// Normalized app name
    pub name: String,
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
    /// Whether the app is now listed in `INSTALLED_APPS`
    pub registered: bool,
}

/// Add `app_name` to `INSTALLED_APPS` in the registry module.
///
/// Returns `false` when the registry file or the list is missing. An app
/// that is already listed counts as registered.
pub fn register_app(registry_path: &Path, app_name: &str) -> CoreResult<bool> {
    if !registry_path.is_file() {
        warn!("Registry file not found: {:?}", registry_path);
        return Ok(false);
    }

    let content = fs::read_to_string(registry_path)?;
    let (patched, registered) = add_list_entry(&content, INSTALLED_APPS, app_name);
    if !registered {
        warn!("{} list not found in {:?}", INSTALLED_APPS, registry_path);
        return Ok(false);
    }

    if patched != content {
        fs::write(registry_path, patched)?;
        debug!("Registered '{}' in {:?}", app_name, registry_path);
    } else if !is_listed(&content, app_name) {
        warn!(
            "'{}' appears only in a commented line of {}; it will not be loaded",
            app_name, INSTALLED_APPS
        );
    }
    Ok(true)
}

/// Whether `app_name` is an active, uncommented `INSTALLED_APPS` entry.
fn is_listed(content: &str, app_name: &str) -> bool {
    list_entries(content, INSTALLED_APPS)
        .map(|entries| entries.iter().any(|entry| entry == app_name))
        .unwrap_or(false)
}

/// Active `INSTALLED_APPS` entries, or `None` when the list cannot be read.
pub fn installed_apps(registry_path: &Path) -> Option<Vec<String>> {
    let content = fs::read_to_string(registry_path).ok()?;
    list_entries(&content, INSTALLED_APPS)
}

/// App directories under `apps_dir`, sorted by name.
///
/// A directory counts when its name does not start with `_` and it holds an
/// `__init__.py` or a `routes.py`.
pub fn app_directories(apps_dir: &Path) -> CoreResult<Vec<String>> {
    if !apps_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(apps_dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        if !path.is_dir() || name.starts_with('_') {
            continue;
        }
        if path.join("__init__.py").is_file() || path.join("routes.py").is_file() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Create an app module from the app templates and register it.
///
/// The app directory is removed again if expansion fails.
pub fn create_app(
    layout: &ProjectLayout,
    library: &TemplateLibrary,
    raw_name: &str,
) -> CoreResult<CreatedApp> {
    let name = validate_app_name(raw_name)?;

    let apps_dir = layout.apps_dir();
    if !apps_dir.is_dir() {
        return Err(CoreError::MissingDirectory(apps_dir.display().to_string()));
    }

    let app_path = layout.app_path(&name);
    if app_path.exists() {
        return Err(CoreError::AlreadyExists(format!("app/apps/{}", name)));
    }

    let templates = library.templates(TemplateKind::App)?;
    info!("Creating app '{}'", name);

    let files = match TemplateExpander::new().expand_files(&templates, &app_path, &module_context(&name)) {
        Ok(files) => files,
        Err(e) => {
            if app_path.exists() {
                if let Err(cleanup) = fs::remove_dir_all(&app_path) {
                    warn!("Failed to remove partial app {:?}: {}", app_path, cleanup);
                }
            }
            return Err(e.into());
        }
    };

    let registered = register_app(&layout.registry_file(), &name)?;

    Ok(CreatedApp {
        name,
        path: app_path,
        files,
        registered,
    })
}

/// One app as reported by `list_apps`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppInfo {
    pub name: String,
    pub registered: bool,
    /// Module files present in the app directory
    pub files: Vec<String>,
}

/// Listing of a project's apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppListing {
    pub apps: Vec<AppInfo>,
    /// Registry entries with no matching directory
    pub missing: Vec<String>,
    /// `false` when `INSTALLED_APPS` could not be read
    pub registry_found: bool,
}

pub fn list_apps(layout: &ProjectLayout) -> CoreResult<AppListing> {
    let apps_dir = layout.apps_dir();
    if !apps_dir.is_dir() {
        return Err(CoreError::MissingDirectory(apps_dir.display().to_string()));
    }

    let installed = installed_apps(&layout.registry_file());
    if installed.is_none() {
        warn!("Could not read {} from {:?}", INSTALLED_APPS, layout.registry_file());
    }
    let registry_found = installed.is_some();
    let installed = installed.unwrap_or_default();

    let directories = app_directories(&apps_dir)?;
    let apps = directories
        .iter()
        .map(|name| {
            let dir = apps_dir.join(name);
            AppInfo {
                name: name.clone(),
                registered: installed.contains(name),
                files: APP_MODULE_FILES
                    .iter()
                    .filter(|file| dir.join(file).is_file())
                    .map(|file| file.to_string())
                    .collect(),
            }
        })
        .collect();

    let missing = installed
        .into_iter()
        .filter(|name| !directories.contains(name))
        .collect();

    Ok(AppListing {
        apps,
        missing,
        registry_found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const REGISTRY: &str = "INSTALLED_APPS: list[str] = [\n    # Add your apps here\n]\n";

    fn project(root: &Path) -> ProjectLayout {
        let layout = ProjectLayout::new(root);
        fs::create_dir_all(layout.apps_dir()).unwrap();
        fs::create_dir_all(layout.core_dir()).unwrap();
        fs::write(layout.registry_file(), REGISTRY).unwrap();
        layout
    }

    #[test]
    fn test_register_app() {
        let temp = tempdir().unwrap();
        let layout = project(temp.path());

        assert!(register_app(&layout.registry_file(), "users").unwrap());
        assert!(register_app(&layout.registry_file(), "users").unwrap());

        let content = fs::read_to_string(layout.registry_file()).unwrap();
        assert_eq!(content.matches("\"users\"").count(), 1);
        assert!(content.contains("# Add your apps here"));
    }

    #[test]
    fn test_commented_entry_counts_as_registered_but_not_listed() {
        let temp = tempdir().unwrap();
        let registry = temp.path().join("registry.py");
        let source = "INSTALLED_APPS = [\n    # \"orders\",\n]\n";
        fs::write(&registry, source).unwrap();

        assert!(register_app(&registry, "orders").unwrap());
        assert_eq!(fs::read_to_string(&registry).unwrap(), source);
        assert!(!is_listed(source, "orders"));
        assert_eq!(installed_apps(&registry), Some(vec![]));
    }

    #[test]
    fn test_register_below_bracketed_comment() {
        let temp = tempdir().unwrap();
        let registry = temp.path().join("registry.py");
        fs::write(&registry, "INSTALLED_APPS = [\n    # e.g. [\"users\"]\n]\n").unwrap();

        assert!(register_app(&registry, "orders").unwrap());
        assert!(is_listed(&fs::read_to_string(&registry).unwrap(), "orders"));
    }

    #[test]
    fn test_register_app_without_list() {
        let temp = tempdir().unwrap();
        let registry = temp.path().join("registry.py");
        assert!(!register_app(&registry, "users").unwrap());

        fs::write(&registry, "APPS = ()\n").unwrap();
        assert!(!register_app(&registry, "users").unwrap());
        assert_eq!(fs::read_to_string(&registry).unwrap(), "APPS = ()\n");
    }

    #[test]
    fn test_app_directories_filters() {
        let temp = tempdir().unwrap();
        let apps = temp.path();
        for dir in ["users", "orders", "_hidden", "empty"] {
            fs::create_dir_all(apps.join(dir)).unwrap();
        }
        fs::write(apps.join("users").join("__init__.py"), "").unwrap();
        fs::write(apps.join("orders").join("routes.py"), "").unwrap();
        fs::write(apps.join("_hidden").join("__init__.py"), "").unwrap();
        fs::write(apps.join("__init__.py"), "").unwrap();

        assert_eq!(app_directories(apps).unwrap(), vec!["orders", "users"]);
    }

    #[test]
    fn test_list_apps_reports_registration() {
        let temp = tempdir().unwrap();
        let layout = project(temp.path());
        fs::write(
            layout.registry_file(),
            "INSTALLED_APPS = [\n    \"users\",\n    # \"legacy\",\n    \"ghost\",\n]\n",
        )
        .unwrap();
        for app in ["users", "orders"] {
            fs::create_dir_all(layout.app_path(app)).unwrap();
            fs::write(layout.app_path(app).join("__init__.py"), "").unwrap();
        }
        fs::write(layout.app_path("users").join("routes.py"), "").unwrap();

        let listing = list_apps(&layout).unwrap();
        assert!(listing.registry_found);
        assert_eq!(
            listing.apps,
            vec![
                AppInfo {
                    name: "orders".to_string(),
                    registered: false,
                    files: vec![],
                },
                AppInfo {
                    name: "users".to_string(),
                    registered: true,
                    files: vec!["routes.py".to_string()],
                },
            ]
        );
        assert_eq!(listing.missing, vec!["ghost"]);
    }

    #[test]
    fn test_create_app_requires_apps_dir() {
        let temp = tempdir().unwrap();
        let layout = ProjectLayout::new(temp.path());
        let library = TemplateLibrary::new(temp.path().join("templates"));

        assert!(matches!(
            create_app(&layout, &library, "users"),
            Err(CoreError::MissingDirectory(_))
        ));
    }

    #[test]
    fn test_create_app_refuses_existing() {
        let temp = tempdir().unwrap();
        let layout = project(temp.path());
        fs::create_dir_all(layout.app_path("users")).unwrap();
        let library = TemplateLibrary::new(temp.path().join("templates"));

        assert!(matches!(
            create_app(&layout, &library, "Users"),
            Err(CoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_create_app_from_custom_templates() {
        let temp = tempdir().unwrap();
        let layout = project(temp.path());
        let app_templates = temp.path().join("templates").join("app");
        fs::create_dir_all(&app_templates).unwrap();
        fs::write(app_templates.join("__init__.py.tpl"), "").unwrap();
        fs::write(
            app_templates.join("models.py.tpl"),
            "class {{model_name}}:\n    __tablename__ = \"{{table_name}}\"\n",
        )
        .unwrap();
        let library = TemplateLibrary::new(temp.path().join("templates"));

        let created = create_app(&layout, &library, "blog-posts").unwrap();
        assert_eq!(created.name, "blog_posts");
        assert!(created.registered);
        assert_eq!(created.files.len(), 2);

        let models = fs::read_to_string(layout.app_path("blog_posts").join("models.py")).unwrap();
        assert_eq!(models, "class BlogPost:\n    __tablename__ = \"blog_posts\"\n");

        let registry = installed_apps(&layout.registry_file()).unwrap();
        assert_eq!(registry, vec!["blog_posts"]);
    }
}
