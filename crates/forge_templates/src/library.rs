//! Template library lookup.
//!
//! The `project` and `app` template sets are compiled into the binary. A
//! directory given with `--templates` or `FORGE_TEMPLATES` replaces them.

use std::fmt;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::expander::{TemplateExpander, TemplateFile};

/// Environment variable overriding the template library location.
pub const TEMPLATES_ENV: &str = "FORGE_TEMPLATES";

/// Template sets shipped with forge
#[derive(RustEmbed)]
#[folder = "templates/"]
struct BundledTemplates;

/// A template set inside the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Skeleton of a whole project.
    Project,
    /// One app module under `app/apps/<name>`.
    App,
}

impl TemplateKind {
    pub fn all() -> &'static [TemplateKind] {
        &[TemplateKind::Project, TemplateKind::App]
    }

    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::App => "app",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LibrarySource {
    /// Root directory holding one subdirectory per [`TemplateKind`]
    Directory(PathBuf),
    Bundled,
}

/// Where project and app templates are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLibrary {
    source: LibrarySource,
}

impl TemplateLibrary {
    /// Library read from a directory on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            source: LibrarySource::Directory(root.into()),
        }
    }

    /// Library compiled into the binary.
    pub fn bundled() -> Self {
        Self {
            source: LibrarySource::Bundled,
        }
    }

    /// Locate the library: explicit path, then `FORGE_TEMPLATES`, then the
    /// bundled templates.
    pub fn discover(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            debug!("Using template library from argument: {:?}", path);
            return Self::new(path);
        }

        if let Some(path) = std::env::var_os(TEMPLATES_ENV) {
            debug!("Using template library from {}: {:?}", TEMPLATES_ENV, path);
            return Self::new(path);
        }

        debug!("Using bundled template library");
        Self::bundled()
    }

    /// Directory the library is read from; `None` for the bundled library.
    pub fn root(&self) -> Option<&Path> {
        match &self.source {
            LibrarySource::Directory(root) => Some(root.as_path()),
            LibrarySource::Bundled => None,
        }
    }

    /// Directory of a template set; `None` for the bundled library.
    pub fn path(&self, kind: TemplateKind) -> Option<PathBuf> {
        self.root().map(|root| root.join(kind.dir_name()))
    }

    /// Load every template of a set, in expansion order.
    ///
    /// A missing directory, or a bundled set with no templates, is `NotFound`.
    pub fn templates(&self, kind: TemplateKind) -> TemplateResult<Vec<TemplateFile>> {
        let expander = TemplateExpander::new();
        match &self.source {
            LibrarySource::Directory(root) => {
                let path = root.join(kind.dir_name());
                if !path.is_dir() {
                    return Err(TemplateError::NotFound(format!(
                        "{} templates not found at {:?}",
                        kind, path
                    )));
                }
                expander.load(&path)
            }
            LibrarySource::Bundled => {
                let templates = bundled_templates(&expander, kind)?;
                if templates.is_empty() {
                    return Err(TemplateError::NotFound(format!(
                        "no bundled {} templates",
                        kind
                    )));
                }
                Ok(templates)
            }
        }
    }

    /// Render a whole template set into `destination_root`.
    pub fn expand(
        &self,
        kind: TemplateKind,
        destination_root: &Path,
        context: &TemplateContext,
    ) -> TemplateResult<Vec<PathBuf>> {
        let templates = self.templates(kind)?;
        TemplateExpander::new().expand_files(&templates, destination_root, context)
    }

    /// Check every template set exists and holds at least one template.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for kind in TemplateKind::all() {
            match self.templates(*kind) {
                Ok(templates) if templates.is_empty() => {
                    issues.push(format!("{} template set is empty", kind));
                }
                Ok(_) => {}
                Err(e) => issues.push(e.to_string()),
            }
        }

        if !issues.is_empty() {
            warn!("Template library {:?} has {} issue(s)", self.source, issues.len());
        }
        issues
    }
}

fn bundled_templates(
    expander: &TemplateExpander,
    kind: TemplateKind,
) -> TemplateResult<Vec<TemplateFile>> {
    let prefix = format!("{}/", kind.dir_name());
    let mut templates = Vec::new();

    for file in BundledTemplates::iter() {
        let Some(relative) = file.strip_prefix(prefix.as_str()) else {
            continue;
        };
        let relative = PathBuf::from(relative);
        let is_template = relative
            .file_name()
            .map(|name| expander.is_template(&name.to_string_lossy()))
            .unwrap_or(false);
        if !is_template {
            continue;
        }

        let Some(embedded) = BundledTemplates::get(&file) else {
            continue;
        };
        let content = String::from_utf8(embedded.data.into_owned())
            .map_err(|_| TemplateError::Encoding(file.to_string()))?;
        templates.push(TemplateFile { relative, content });
    }

    templates.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_paths() {
        let library = TemplateLibrary::new("/tmp/tpl");
        assert_eq!(library.path(TemplateKind::Project), Some(PathBuf::from("/tmp/tpl/project")));
        assert_eq!(library.path(TemplateKind::App), Some(PathBuf::from("/tmp/tpl/app")));
        assert_eq!(TemplateLibrary::bundled().path(TemplateKind::App), None);
    }

    #[test]
    fn test_explicit_path_wins() {
        let library = TemplateLibrary::discover(Some(Path::new("/custom")));
        assert_eq!(library.root(), Some(Path::new("/custom")));
    }

    #[test]
    fn test_validate_reports_missing_and_empty_sets() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("app")).unwrap();

        let library = TemplateLibrary::new(temp.path());
        let issues = library.validate();
        assert_eq!(issues.len(), 2);
        assert!(matches!(
            library.templates(TemplateKind::Project),
            Err(TemplateError::NotFound(_))
        ));
        assert_eq!(library.templates(TemplateKind::App).unwrap(), vec![]);
    }

    #[test]
    fn test_bundled_library_is_complete() {
        assert!(TemplateLibrary::bundled().validate().is_empty());
    }

    #[test]
    fn test_bundled_sets_are_sorted_and_stripped_of_set_prefix() {
        let library = TemplateLibrary::bundled();

        let app: Vec<PathBuf> = library
            .templates(TemplateKind::App)
            .unwrap()
            .into_iter()
            .map(|t| t.relative)
            .collect();
        assert_eq!(app.first(), Some(&PathBuf::from("__init__.py.tpl")));
        assert!(app.contains(&PathBuf::from("routes.py.tpl")));
        assert!(app.windows(2).all(|pair| pair[0] < pair[1]));

        let project = library.templates(TemplateKind::Project).unwrap();
        assert!(project
            .iter()
            .any(|t| t.relative == Path::new("app/core/registry.py.tpl")));
        assert!(project.iter().any(|t| t.relative == Path::new(".env.example.tpl")));
    }
}
