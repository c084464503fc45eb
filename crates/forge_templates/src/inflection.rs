//! Case conversion and naive English inflection.
//!
//! All functions are total: any input, including the empty string, yields a
//! result. Pluralization is a suffix heuristic, not a dictionary, so
//! irregular nouns (`person`, `mouse`) are not handled.

use std::sync::OnceLock;

use regex::Regex;

fn acronym_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([A-Z]+)([A-Z][a-z])").expect("valid acronym pattern"))
}

fn word_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid word pattern"))
}

fn separator_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[-\s]+").expect("valid separator pattern"))
}

/// Convert to PascalCase.
///
/// Segments are split on `-`, `_` and whitespace; each segment is lowercased
/// and then has its first character uppercased. Input without separators is a
/// single segment, so `UserProfile` becomes `Userprofile`.
pub fn to_pascal_case(text: &str) -> String {
    text.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
            }
        })
        .collect()
}

/// Convert to snake_case.
///
/// Handles acronym prefixes (`HTTPServer` -> `http_server`), camelCase
/// (`orderItems` -> `order_items`) and kebab or spaced names.
pub fn to_snake_case(text: &str) -> String {
    let text = acronym_boundary().replace_all(text, "${1}_${2}");
    let text = word_boundary().replace_all(&text, "${1}_${2}");
    let text = separator_run().replace_all(&text, "_");
    text.to_lowercase()
}

/// Convert a plural noun to its singular form.
pub fn to_singular(text: &str) -> String {
    if let Some(stem) = text.strip_suffix("ies") {
        return format!("{}y", stem);
    }

    if let Some(stem) = text.strip_suffix("es") {
        if matches!(stem.chars().last(), Some('s' | 'x' | 'z')) {
            return stem.to_string();
        }
    }

    if !text.ends_with("ss") {
        if let Some(stem) = text.strip_suffix('s') {
            return stem.to_string();
        }
    }

    text.to_string()
}

/// Convert a singular noun to its plural form.
pub fn to_plural(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    if let Some(stem) = text.strip_suffix('y') {
        let consonant_before = stem
            .chars()
            .last()
            .is_some_and(|c| !matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
        if consonant_before {
            return format!("{}ies", stem);
        }
    }

    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| text.ends_with(suffix)) {
        return format!("{}es", text);
    }

    format!("{}s", text)
}
