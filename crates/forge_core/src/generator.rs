//! New project generation.
//!
//! Generation runs in a fixed order: package manager init, project template
//! expansion, feature add-ons, then dependency installation. Templates are
//! expanded after `uv init` so the generated `pyproject.toml` wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use forge_runner::PackageManager;
use forge_templates::{project_context, TemplateContext, TemplateExpander, TemplateKind, TemplateLibrary};

use crate::config::{Linter, ProjectConfig, Structure};
use crate::error::{CoreError, CoreResult};
use crate::naming::validate_python_version;

const VIEW_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="UTF-8">
        <meta name="viewport" content="width=device-width, initial-scale=1.0">
        <title>{{project_name}}</title>
        <link rel="stylesheet" href="/static/css/style.css">
    </head>
    <body>
        <h1>Hello from {{project_name}}!</h1>
        <script src="/static/js/main.js"></script>
    </body>
</html>
"#;

const VIEW_CSS: &str = r#"body {
    font-family: sans-serif;
    background-color: #f0fdf4;
    color: #166534;
    display: flex;
    justify-content: center;
    align-items: center;
    height: 100vh;
    margin: 0;
}
"#;

const VIEW_JS: &str = "console.log(\"FastAPI views are active!\");\n";

const TEST_MAIN: &str = r#"from fastapi.testclient import TestClient

from app.main import app

client = TestClient(app)


def test_app_starts():
    response = client.get("/docs")
    assert response.status_code == 200
"#;

const RUFF_CONFIG: &str = r#"line-length = 88
target-version = "py{{python_tag}}"

[lint]
select = ["E", "F", "I", "B", "UP"]
"#;

const FLAKE8_CONFIG: &str = r#"[flake8]
max-line-length = 88
extend-ignore = E203
exclude = .git,__pycache__,.venv
"#;

/// File written by `uv export`.
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Stub module some `uv init` versions create.
const UV_STUB: &str = "hello.py";

/// Outcome of generating a project.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProject {
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
    pub dependencies: Vec<String>,
    /// Dependencies were installed by the package manager
    pub installed: bool,
}

/// Generates new projects from the project template set.
pub struct ProjectGenerator<'a> {
    library: &'a TemplateLibrary,
    package_manager: Option<&'a dyn PackageManager>,
}

impl<'a> ProjectGenerator<'a> {
    pub fn new(library: &'a TemplateLibrary) -> Self {
        Self {
            library,
            package_manager: None,
        }
    }

    /// Use `manager` for projects configured with `install`.
    pub fn with_package_manager(mut self, manager: &'a dyn PackageManager) -> Self {
        self.package_manager = Some(manager);
        self
    }

    /// Rendering context for the project templates.
    pub fn context(config: &ProjectConfig) -> TemplateContext {
        let mut context = project_context(&config.name);
        context.insert("python_version", &config.python);
        context.insert("python_tag", config.python.replace('.', ""));
        context.insert("database_engine", config.database.id());
        context.insert("database_url", config.database.url_example());
        context.insert("orm", config.orm.id());
        context
    }

    pub fn generate(&self, config: &ProjectConfig) -> CoreResult<GeneratedProject> {
        validate_python_version(&config.python)?;

        if !config.in_place && config.path.exists() {
            return Err(CoreError::AlreadyExists(config.name.clone()));
        }

        let templates = self.library.templates(TemplateKind::Project)?;

        let manager = match (config.install, self.package_manager) {
            (true, Some(manager)) => {
                if !manager.is_available() {
                    return Err(CoreError::ToolNotAvailable(manager.name().to_string()));
                }
                Some(manager)
            }
            _ => None,
        };

        if let Some(manager) = manager {
            info!("Initialising environment with {} (Python {})", manager.name(), config.python);
            manager.init(&config.path, &config.python)?;
        }

        info!("Scaffolding project '{}'", config.name);
        let context = Self::context(config);
        let mut files = TemplateExpander::new().expand_files(&templates, &config.path, &context)?;
        files.extend(write_addons(&config.path, config, &context)?);

        let stub = config.path.join(UV_STUB);
        if stub.is_file() {
            fs::remove_file(&stub)?;
        }

        let dependencies = config.dependencies();
        if let Some(manager) = manager {
            info!("Installing {} dependencies", dependencies.len());
            manager.add(&config.path, &dependencies)?;

            let requirements = manager.export_requirements(&config.path)?;
            let requirements_path = config.path.join(REQUIREMENTS_FILE);
            fs::write(&requirements_path, requirements)?;
            files.push(requirements_path);
        }

        Ok(GeneratedProject {
            path: config.path.clone(),
            files,
            dependencies,
            installed: manager.is_some(),
        })
    }
}

fn write_file(path: PathBuf, content: &str) -> CoreResult<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    debug!("Wrote {:?}", path);
    Ok(path)
}

/// Write the files for optional features selected in `config`.
fn write_addons(
    root: &Path,
    config: &ProjectConfig,
    context: &TemplateContext,
) -> CoreResult<Vec<PathBuf>> {
    let render = |content: &str| forge_templates::render(content, context);
    let mut files = Vec::new();

    if config.views {
        let views = root.join("views");
        files.push(write_file(views.join("html").join("index.html"), &render(VIEW_HTML))?);
        files.push(write_file(views.join("css").join("style.css"), VIEW_CSS)?);
        files.push(write_file(views.join("js").join("main.js"), VIEW_JS)?);
        files.push(write_file(views.join("assets").join(".gitkeep"), "")?);
    }

    if config.structure == Structure::Advanced {
        for package in ["controllers", "models", "schemas"] {
            files.push(write_file(root.join("app").join(package).join("__init__.py"), "")?);
        }
        for dir in ["migrations", "seeders"] {
            files.push(write_file(root.join("database").join(dir).join(".gitkeep"), "")?);
        }
    }

    if config.tests {
        files.push(write_file(root.join("tests").join("__init__.py"), "")?);
        files.push(write_file(root.join("tests").join("test_main.py"), TEST_MAIN)?);
    }

    match config.linter {
        Linter::Ruff => files.push(write_file(root.join(".ruff.toml"), &render(RUFF_CONFIG))?),
        Linter::Classic => files.push(write_file(root.join(".flake8"), FLAKE8_CONFIG)?),
        Linter::None => {}
    }

    Ok(files)
}
