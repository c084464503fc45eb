//! Rendering contexts and the builders for projects and app modules.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::inflection::{to_pascal_case, to_singular, to_snake_case};

/// Flat mapping from placeholder name to substitution value.
///
/// Values are stored already stringified, so numbers and booleans render the
/// same way their `Display` impl prints them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_value(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another context into this one; keys in `other` win.
    pub fn extend(&mut self, other: TemplateContext) {
        self.values.extend(other.values);
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Self::new();
        for (name, value) in iter {
            context.insert(name, value);
        }
        context
    }
}

/// Context for a new app module.
///
/// The raw name is normalized to snake_case first; the model name is the
/// PascalCase singular of that normalized name.
pub fn module_context(raw_name: &str) -> TemplateContext {
    let app_name = to_snake_case(raw_name);
    let singular = to_singular(&app_name);
    let pascal = to_pascal_case(&app_name);

    TemplateContext::new()
        .with_value("app_name", &app_name)
        .with_value("app_name_pascal", &pascal)
        .with_value("model_name", to_pascal_case(&singular))
        .with_value("table_name", &app_name)
        .with_value("app_description", format!("{} module", pascal))
}

/// Context for a new project.
///
/// `project_name` keeps the raw name, since hyphens are meaningful to the
/// packaging layer; only the derived keys are normalized.
pub fn project_context(raw_name: &str) -> TemplateContext {
    TemplateContext::new()
        .with_value("project_name", raw_name)
        .with_value("project_name_snake", to_snake_case(raw_name))
        .with_value("project_name_pascal", to_pascal_case(raw_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_context_simple_name() {
        let context = module_context("users");
        assert_eq!(context.get("app_name"), Some("users"));
        assert_eq!(context.get("app_name_pascal"), Some("Users"));
        assert_eq!(context.get("model_name"), Some("User"));
        assert_eq!(context.get("table_name"), Some("users"));
        assert_eq!(context.get("app_description"), Some("Users module"));
    }

    #[test]
    fn test_module_context_snake_case_name() {
        let context = module_context("order_items");
        assert_eq!(context.get("app_name_pascal"), Some("OrderItems"));
        assert_eq!(context.get("model_name"), Some("OrderItem"));
        assert_eq!(context.get("table_name"), Some("order_items"));
    }

    #[test]
    fn test_module_context_normalizes_input() {
        let pascal = module_context("UserProfile");
        assert_eq!(pascal.get("app_name"), Some("user_profile"));
        assert_eq!(pascal.get("app_name_pascal"), Some("UserProfile"));

        let kebab = module_context("user-profile");
        assert_eq!(kebab.get("app_name"), Some("user_profile"));

        let plural = module_context("Categories");
        assert_eq!(plural.get("model_name"), Some("Category"));
    }

    #[test]
    fn test_project_context() {
        let context = project_context("my-project");
        assert_eq!(context.get("project_name"), Some("my-project"));
        assert_eq!(context.get("project_name_snake"), Some("my_project"));
        assert_eq!(context.get("project_name_pascal"), Some("MyProject"));

        let single = project_context("myproject");
        assert_eq!(single.get("project_name_pascal"), Some("Myproject"));
    }

    #[test]
    fn test_context_stringifies_values() {
        let context = TemplateContext::new()
            .with_value("count", 42)
            .with_value("active", true);
        assert_eq!(context.get("count"), Some("42"));
        assert_eq!(context.get("active"), Some("true"));
    }

    #[test]
    fn test_context_extend_overrides() {
        let mut base: TemplateContext = [("a", "1"), ("b", "2")].into_iter().collect();
        base.extend(TemplateContext::new().with_value("b", "3"));
        assert_eq!(base.get("b"), Some("3"));
        assert_eq!(base.len(), 2);
    }
}
