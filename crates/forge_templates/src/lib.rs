//! # forge_templates
//!
//! Template rendering and source patching for forge.
//!
//! This crate is the text engine behind project and app generation:
//!
//! - Case conversion and naive pluralization
//! - Flat `{{placeholder}}` rendering
//! - Expansion of `.tpl` template trees into mirrored destination trees
//! - Context builders for projects and app modules
//! - Regex-level patching of list literals, scalar settings and env files
//!
//! ## Example
//!
//! ```rust,no_run
//! use forge_templates::{add_list_entry, module_context, TemplateKind, TemplateLibrary};
//! use std::path::Path;
//!
//! let library = TemplateLibrary::discover(None);
//! let context = module_context("order-items");
//!
//! let created = library
//!     .expand(TemplateKind::App, Path::new("./app/apps/order_items"), &context)
//!     .unwrap();
//!
//! let registry = "INSTALLED_APPS: list[str] = [\n]\n";
//! let (patched, registered) = add_list_entry(registry, "INSTALLED_APPS", "order_items");
//! ```

pub mod context;
pub mod error;
pub mod expander;
pub mod inflection;
pub mod library;
pub mod patch;
pub mod renderer;

pub use context::{module_context, project_context, TemplateContext};
pub use error::{TemplateError, TemplateResult};
pub use expander::{expand, TemplateExpander, TemplateFile, TEMPLATE_SUFFIX};
pub use inflection::{to_pascal_case, to_plural, to_singular, to_snake_case};
pub use library::{TemplateKind, TemplateLibrary, TEMPLATES_ENV};
pub use patch::{add_list_entry, env_value, list_entries, set_env_var, set_scalar_value};
pub use renderer::{render, TemplateRenderer};
