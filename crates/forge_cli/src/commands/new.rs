//! New command - Create a new FastAPI project.

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use forge_core::{
    DatabaseEngine, Linter, Orm, ProjectConfig, ProjectDefaults, ProjectGenerator, Structure,
};

use super::{display_path, CommandContext};

#[derive(Args)]
pub struct NewArgs {
    /// Project name (omit to initialise the current directory)
    pub name: Option<String>,

    /// Directory structure (simple, advanced)
    #[arg(long)]
    pub structure: Option<Structure>,

    /// ORM package (sqlmodel, sqlalchemy, none)
    #[arg(long)]
    pub orm: Option<Orm>,

    /// Linting toolchain (ruff, classic, none)
    #[arg(long)]
    pub linter: Option<Linter>,

    /// Database engine (postgres, mysql, sqlite, mongodb)
    #[arg(long)]
    pub database: Option<DatabaseEngine>,

    /// Python version for the environment
    #[arg(short, long)]
    pub python: Option<String>,

    /// Add a tests package and test dependencies
    #[arg(long)]
    pub tests: bool,

    /// Add HTML, CSS and JS view files
    #[arg(long)]
    pub views: bool,

    /// Skip the package manager
    #[arg(long)]
    pub no_install: bool,
}

impl NewArgs {
    /// Overlay explicit flags on `config`.
    fn apply(&self, mut config: ProjectConfig) -> ProjectConfig {
        if let Some(structure) = self.structure {
            config.structure = structure;
        }
        if let Some(orm) = self.orm {
            config.orm = orm;
        }
        if let Some(linter) = self.linter {
            config.linter = linter;
        }
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(python) = &self.python {
            config.python = python.clone();
        }
        config.tests |= self.tests;
        config.views |= self.views;
        if self.no_install {
            config.install = false;
        }
        config
    }
}

pub fn execute(args: NewArgs, context: &CommandContext) -> Result<()> {
    let current_dir = std::env::current_dir().context("Failed to read working directory")?;
    let defaults = ProjectDefaults::load(&current_dir).context("Failed to load forge.yaml")?;

    let base = match &args.name {
        Some(name) => ProjectConfig::new(name.trim(), &current_dir),
        None => {
            warn!("No project name given, initialising {:?}", current_dir);
            ProjectConfig::in_place(&current_dir)
        }
    };
    let config = args.apply(base.with_defaults(&defaults));

    info!("Creating project: {}", config.name);

    let runner = context.package_manager();
    let generator = ProjectGenerator::new(&context.library).with_package_manager(&runner);
    let project = generator.generate(&config)?;

    println!("✓ Project '{}' created successfully!", config.name);
    println!();
    println!("Location: {}", project.path.display());
    println!("Files: {}", project.files.len());
    if !project.installed {
        println!();
        println!("Dependencies (not installed):");
        for dep in &project.dependencies {
            println!("  {}", dep);
        }
    }
    println!();
    println!("Next steps:");
    if !config.in_place {
        println!("  cd {}", display_path(&project.path, &current_dir));
    }
    println!("  forge create-app <name>");
    println!("  uv run fastapi dev");

    Ok(())
}
