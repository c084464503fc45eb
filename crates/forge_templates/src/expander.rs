//! Template tree expansion.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::renderer::TemplateRenderer;

/// Suffix marking a file as a template. Stripped from the destination name.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// A template loaded into memory, addressed relative to its set root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub relative: PathBuf,
    pub content: String,
}

/// Expands a directory of `.tpl` files into a mirrored destination tree.
pub struct TemplateExpander {
    renderer: TemplateRenderer,
    suffix: String,
}

impl Default for TemplateExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateExpander {
    pub fn new() -> Self {
        Self {
            renderer: TemplateRenderer::new(),
            suffix: TEMPLATE_SUFFIX.to_string(),
        }
    }

    /// Use a different marker suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Whether a file named `name` is a template. A bare suffix is not.
    pub fn is_template(&self, name: &str) -> bool {
        name.ends_with(&self.suffix) && name.len() > self.suffix.len()
    }

    /// Relative paths of every template under `template_root`, sorted.
    ///
    /// Ordering is lexicographic over path components, which keeps expansion
    /// deterministic across platforms and filesystems.
    pub fn templates(&self, template_root: &Path) -> TemplateResult<Vec<PathBuf>> {
        if !template_root.is_dir() {
            return Err(TemplateError::NotFound(format!(
                "Template directory does not exist: {:?}",
                template_root
            )));
        }

        let mut templates = Vec::new();
        for entry in WalkDir::new(template_root).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.is_template(&name) {
                if name == self.suffix {
                    warn!("Skipping template with empty name: {:?}", entry.path());
                }
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(template_root) {
                templates.push(relative.to_path_buf());
            }
        }

        templates.sort();
        Ok(templates)
    }

    /// Destination path of a template, relative to the destination root.
    ///
    /// Only the final segment loses the suffix; directory names are kept.
    pub fn destination_for(&self, relative: &Path) -> PathBuf {
        let name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stripped = name.strip_suffix(self.suffix.as_str()).unwrap_or(&name);
        relative.with_file_name(stripped)
    }

    /// Read every template under `template_root`, in expansion order.
    pub fn load(&self, template_root: &Path) -> TemplateResult<Vec<TemplateFile>> {
        self.templates(template_root)?
            .into_iter()
            .map(|relative| {
                let path = template_root.join(&relative);
                let content = fs::read_to_string(&path)
                    .map_err(|source| TemplateError::Read { path, source })?;
                Ok(TemplateFile { relative, content })
            })
            .collect()
    }

    /// Render every template under `template_root` into `destination_root`.
    ///
    /// Existing files are overwritten. The first read or write failure aborts
    /// the expansion; files written before it are left in place.
    pub fn expand(
        &self,
        template_root: &Path,
        destination_root: &Path,
        context: &TemplateContext,
    ) -> TemplateResult<Vec<PathBuf>> {
        info!(
            "Expanding templates from {:?} into {:?}",
            template_root, destination_root
        );
        let templates = self.load(template_root)?;
        self.expand_files(&templates, destination_root, context)
    }

    /// Render already loaded templates into `destination_root`, in the given order.
    pub fn expand_files(
        &self,
        templates: &[TemplateFile],
        destination_root: &Path,
        context: &TemplateContext,
    ) -> TemplateResult<Vec<PathBuf>> {
        let mut created = Vec::new();
        for template in templates {
            let target = destination_root.join(self.destination_for(&template.relative));
            let rendered = self.renderer.render_content(&template.content, context);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| TemplateError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&target, rendered).map_err(|source| TemplateError::Write {
                path: target.clone(),
                source,
            })?;

            debug!("Rendered: {:?}", template.relative);
            created.push(target);
        }

        info!("Expanded {} template(s)", created.len());
        Ok(created)
    }
}

/// Expand `template_root` into `destination_root` with the default `.tpl` marker.
pub fn expand(
    template_root: &Path,
    destination_root: &Path,
    context: &TemplateContext,
) -> TemplateResult<Vec<PathBuf>> {
    TemplateExpander::new().expand(template_root, destination_root, context)
}
