//! Integration tests running core operations against the bundled templates.

use std::fs;
use std::path::Path;

use forge_core::{
    add_database, create_app, list_apps, run_doctor, CoreError, DatabaseEngine, Linter,
    ProjectConfig, ProjectGenerator, ProjectLayout, REQUIREMENTS_FILE,
};
use forge_runner::{PackageManager, RunnerResult};
use forge_templates::TemplateLibrary;
use mockall::mock;
use tempfile::tempdir;

mock! {
    pub Manager {}

    impl PackageManager for Manager {
        fn name(&self) -> &str;
        fn is_available(&self) -> bool;
        fn init(&self, project_dir: &Path, python: &str) -> RunnerResult<()>;
        fn add(&self, project_dir: &Path, packages: &[String]) -> RunnerResult<()>;
        fn export_requirements(&self, project_dir: &Path) -> RunnerResult<String>;
    }
}

fn bundled() -> TemplateLibrary {
    TemplateLibrary::bundled()
}

fn generate(root: &Path, name: &str) -> ProjectLayout {
    let library = bundled();
    let mut config = ProjectConfig::new(name, root);
    config.install = false;
    let project = ProjectGenerator::new(&library).generate(&config).unwrap();
    ProjectLayout::new(project.path)
}

#[test]
fn test_generated_project_passes_doctor() {
    let temp = tempdir().unwrap();
    let layout = generate(temp.path(), "shop");

    let report = run_doctor(&layout);
    assert!(report.is_healthy(), "{:?}", report);
}

#[test]
fn test_create_app_in_generated_project() {
    let temp = tempdir().unwrap();
    let layout = generate(temp.path(), "shop");
    let library = bundled();

    let created = create_app(&layout, &library, "OrderItems").unwrap();
    assert_eq!(created.name, "order_items");
    assert!(created.registered);
    assert!(layout.app_path("order_items").join("routes.py").is_file());

    let registry = fs::read_to_string(layout.registry_file()).unwrap();
    assert!(registry.contains("\"order_items\","));
    assert!(registry.contains("# Add your apps here"));

    let listing = list_apps(&layout).unwrap();
    assert_eq!(listing.apps.len(), 1);
    assert!(listing.apps[0].registered);
    assert!(listing.missing.is_empty());

    assert!(run_doctor(&layout).is_healthy());

    assert!(matches!(
        create_app(&layout, &library, "order_items"),
        Err(CoreError::AlreadyExists(_))
    ));
}

#[test]
fn test_create_app_rejects_reserved_name() {
    let temp = tempdir().unwrap();
    let layout = generate(temp.path(), "shop");

    assert!(matches!(
        create_app(&layout, &bundled(), "core"),
        Err(CoreError::InvalidName(_))
    ));
    assert!(!layout.app_path("core").exists());
}

#[test]
fn test_add_database_switches_engine() {
    let temp = tempdir().unwrap();
    let layout = generate(temp.path(), "shop");

    let change = add_database(layout.root(), DatabaseEngine::Postgres).unwrap();
    assert!(change.config_updated);
    assert!(change.env_updated);

    let config = fs::read_to_string(layout.config_file()).unwrap();
    assert!(config.contains("DATABASE_ENGINE: str = \"postgres\""));
    let env = fs::read_to_string(layout.env_file()).unwrap();
    assert!(env.contains("DATABASE_ENGINE=postgres"));

    add_database(layout.root(), DatabaseEngine::Sqlite).unwrap();
    let env = fs::read_to_string(layout.env_file()).unwrap();
    assert!(env.contains("DATABASE_ENGINE=sqlite"));
    assert!(env.contains("DATABASE_URL=sqlite:///./app.db"));
}

#[test]
fn test_generate_with_package_manager() {
    let temp = tempdir().unwrap();
    let library = bundled();
    let mut config = ProjectConfig::new("api", temp.path());
    config.linter = Linter::None;
    let expected_deps = config.dependencies();
    let project_dir = config.path.clone();

    let mut manager = MockManager::new();
    manager.expect_name().return_const("uv".to_string());
    manager.expect_is_available().times(1).return_const(true);
    manager
        .expect_init()
        .withf(|_, python| python.to_string() == "3.10")
        .times(1)
        .returning(|dir, _| {
            fs::create_dir_all(dir).unwrap();
            fs::write(dir.join("hello.py"), "print('hello')").unwrap();
            Ok(())
        });
    manager
        .expect_add()
        .withf(move |dir, packages| dir.to_path_buf() == project_dir && packages.to_vec() == expected_deps)
        .times(1)
        .returning(|_, _| Ok(()));
    manager
        .expect_export_requirements()
        .times(1)
        .returning(|_| Ok("fastapi==0.115.0\n".to_string()));

    let project = ProjectGenerator::new(&library)
        .with_package_manager(&manager)
        .generate(&config)
        .unwrap();

    assert!(project.installed);
    assert!(!project.path.join("hello.py").exists());
    assert_eq!(
        fs::read_to_string(project.path.join(REQUIREMENTS_FILE)).unwrap(),
        "fastapi==0.115.0\n"
    );
    assert!(project.path.join("pyproject.toml").is_file());
}

#[test]
fn test_generate_fails_when_tool_missing() {
    let temp = tempdir().unwrap();
    let library = bundled();
    let config = ProjectConfig::new("api", temp.path());

    let mut manager = MockManager::new();
    manager.expect_name().return_const("uv".to_string());
    manager.expect_is_available().return_const(false);
    manager.expect_init().never();

    let result = ProjectGenerator::new(&library)
        .with_package_manager(&manager)
        .generate(&config);

    assert!(matches!(result, Err(CoreError::ToolNotAvailable(tool)) if tool == "uv"));
    assert!(!config.path.exists());
}
