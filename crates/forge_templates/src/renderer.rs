//! Placeholder rendering.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::context::TemplateContext;

/// Template renderer substituting `{{name}}` placeholders.
///
/// There is no control flow: a placeholder is either replaced by its context
/// value or, when the key is unknown, left in the output untouched.
pub struct TemplateRenderer {
    variable_pattern: Regex,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Create a new template renderer.
    pub fn new() -> Self {
        Self {
            // Match {{variable_name}} pattern
            variable_pattern: Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}")
                .expect("valid placeholder pattern"),
        }
    }

    /// Render content by replacing variables.
    pub fn render_content(&self, content: &str, context: &TemplateContext) -> String {
        self.variable_pattern
            .replace_all(content, |caps: &Captures| match context.get(&caps[1]) {
                Some(value) => value.to_string(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Names of all placeholders in `content`, in order of appearance.
    pub fn placeholders<'a>(&self, content: &'a str) -> Vec<&'a str> {
        self.variable_pattern
            .captures_iter(content)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }
}

fn shared_renderer() -> &'static TemplateRenderer {
    static RENDERER: OnceLock<TemplateRenderer> = OnceLock::new();
    RENDERER.get_or_init(TemplateRenderer::new)
}

/// Render `content` with the shared renderer.
pub fn render(content: &str, context: &TemplateContext) -> String {
    shared_renderer().render_content(content, context)
}
