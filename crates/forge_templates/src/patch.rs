//! Line-level patching of generated Python sources and env files.
//!
//! These are line-level edits, not a parser. A list literal is found only when
//! its body is flat: brackets inside strings and `#` comments are ignored, but
//! a nested or unclosed list is reported as not found and the text is
//! returned unchanged.

use std::sync::OnceLock;

use regex::{Captures, Regex};

const DEFAULT_INDENT: &str = "    ";

/// Assignment of `list_name`, up to and including the opening bracket.
fn list_header(list_name: &str) -> Regex {
    let pattern = format!(
        r"\b{}[ \t]*(?::[^=\n]*)?=[ \t]*\[",
        regex::escape(list_name)
    );
    Regex::new(&pattern).expect("escaped list pattern is valid")
}

fn scalar_pattern(key: &str) -> Regex {
    let pattern = format!(
        r#"(\b{}[ \t]*(?::[^=\n]*)?=[ \t]*)(?:"[^"\n]*"|'[^'\n]*')"#,
        regex::escape(key)
    );
    Regex::new(&pattern).expect("escaped scalar pattern is valid")
}

fn env_pattern(key: &str) -> Regex {
    let pattern = format!(r"(?m)^({}=)[^\r\n]*", regex::escape(key));
    Regex::new(&pattern).expect("escaped env pattern is valid")
}

fn quoted_word() -> &'static Regex {
    static QUOTED_WORD: OnceLock<Regex> = OnceLock::new();
    QUOTED_WORD.get_or_init(|| {
        Regex::new(r#"["']([A-Za-z0-9_]+)["']"#).expect("valid quoted word pattern")
    })
}

/// Offset of the `]` closing a list whose body starts at `body`.
///
/// Brackets inside string literals and `#` comments are skipped. `None` when
/// the body opens a nested list or is never closed.
fn closing_bracket(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut in_comment = false;

    for (idx, c) in body.char_indices() {
        if in_comment {
            in_comment = c != '\n';
            continue;
        }
        match quote {
            Some(q) if c == q || c == '\n' => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '#' => in_comment = true,
                '[' => return None,
                ']' => return Some(idx),
                _ => {}
            },
        }
    }
    None
}

/// Start and end offsets of the body of the list assigned to `list_name`.
fn list_body(text: &str, list_name: &str) -> Option<(usize, usize)> {
    let start = list_header(list_name).find(text)?.end();
    let end = start + closing_bracket(&text[start..])?;
    Some((start, end))
}

/// Length of the part of `line` before a `#` comment that is not inside quotes.
fn code_len(line: &str) -> usize {
    let mut quote: Option<char> = None;
    for (idx, c) in line.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' => return idx,
            None => {}
        }
    }
    line.len()
}

/// Byte offset just past the last code character in `body`, and whether that
/// code already ends with a comma. `None` when the body holds only comments
/// and whitespace.
fn last_code_end(body: &str) -> Option<(usize, bool)> {
    let mut lines = Vec::new();
    let mut start = 0;
    for line in body.split('\n') {
        lines.push((start, line));
        start += line.len() + 1;
    }

    lines.into_iter().rev().find_map(|(start, line)| {
        let code = line[..code_len(line)].trim_end();
        if code.trim_start().is_empty() {
            None
        } else {
            Some((start + code.len(), code.ends_with(',')))
        }
    })
}

/// Leading whitespace of the first non-blank line after the opening bracket.
fn entry_indent(body: &str) -> Option<&str> {
    body.split('\n').skip(1).find_map(|line| {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            None
        } else {
            Some(&line[..line.len() - trimmed.len()])
        }
    })
}

/// Leading whitespace of the line containing byte offset `at`.
fn line_indent(text: &str, at: usize) -> &str {
    let line_start = text[..at].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &text[line_start..];
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Insert `entry` as a double-quoted element of the list assigned to `list_name`.
///
/// Returns the new text and whether the entry is now registered. An entry
/// already present (single or double quoted) leaves the text unchanged and
/// still reports `true`; a missing or nested list reports `false`.
pub fn add_list_entry(text: &str, list_name: &str, entry: &str) -> (String, bool) {
    let Some((body_start, body_end)) = list_body(text, list_name) else {
        return (text.to_string(), false);
    };
    let body = &text[body_start..body_end];

    if body.contains(&format!("\"{}\"", entry)) || body.contains(&format!("'{}'", entry)) {
        return (text.to_string(), true);
    }

    let newline = if body.contains("\r\n") { "\r\n" } else { "\n" };
    let base_indent = line_indent(text, body_start);
    let indent = entry_indent(body)
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}{}", base_indent, DEFAULT_INDENT));

    let content_end = body.trim_end().len();
    let mut head = if body.trim().is_empty() {
        String::new()
    } else {
        body[..content_end].to_string()
    };
    if let Some((end, false)) = last_code_end(body) {
        head.insert(end, ',');
    }

    let tail = &body[content_end..];
    let closing_indent = match tail.rfind('\n') {
        Some(idx) => &tail[idx + 1..],
        None => base_indent,
    };

    let new_body = format!(
        "{}{}{}\"{}\",{}{}",
        head, newline, indent, entry, newline, closing_indent
    );

    let mut patched = String::with_capacity(text.len() + new_body.len());
    patched.push_str(&text[..body_start]);
    patched.push_str(&new_body);
    patched.push_str(&text[body_end..]);
    (patched, true)
}

/// Quoted identifiers in the list assigned to `list_name`, skipping commented
/// lines. `None` when the list cannot be found.
pub fn list_entries(text: &str, list_name: &str) -> Option<Vec<String>> {
    let (start, end) = list_body(text, list_name)?;
    let word = quoted_word();

    let entries = text[start..end]
        .split('\n')
        .map(|line| &line[..code_len(line)])
        .flat_map(|code| {
            word.captures_iter(code)
                .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
                .collect::<Vec<_>>()
        })
        .collect();
    Some(entries)
}

fn escape_double_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Replace the quoted value assigned to `key` with `new_value` in double quotes.
///
/// Only the first assignment is rewritten. Name, annotation and spacing
/// around `=` are preserved.
pub fn set_scalar_value(text: &str, key: &str, new_value: &str) -> (String, bool) {
    let pattern = scalar_pattern(key);
    if !pattern.is_match(text) {
        return (text.to_string(), false);
    }

    let quoted = format!("\"{}\"", escape_double_quoted(new_value));
    let patched = pattern
        .replacen(text, 1, |caps: &Captures| format!("{}{}", &caps[1], quoted))
        .into_owned();
    (patched, true)
}

/// Set `key` in a flat `KEY=value` env text.
///
/// The first existing line for the key has its value replaced; otherwise a
/// new line is appended.
pub fn set_env_var(text: &str, key: &str, new_value: &str) -> String {
    let pattern = env_pattern(key);
    if pattern.is_match(text) {
        return pattern
            .replacen(text, 1, |caps: &Captures| format!("{}{}", &caps[1], new_value))
            .into_owned();
    }

    let mut patched = text.to_string();
    if !patched.is_empty() && !patched.ends_with('\n') {
        patched.push('\n');
    }
    patched.push_str(&format!("{}={}\n", key, new_value));
    patched
}

/// Value of the first `KEY=value` line, if present.
pub fn env_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("{}=", key);
    text.lines()
        .find_map(|line| line.strip_prefix(prefix.as_str()))
        .map(str::trim_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = "INSTALLED_APPS: list[str] = [\n    # Add your apps here\n]\n";

    #[test]
    fn test_add_to_empty_list() {
        let (text, changed) = add_list_entry("INSTALLED_APPS: list[str] = [\n]\n", "INSTALLED_APPS", "users");
        assert!(changed);
        assert_eq!(text, "INSTALLED_APPS: list[str] = [\n    \"users\",\n]\n");
    }

    #[test]
    fn test_add_to_inline_empty_list() {
        let (text, changed) = add_list_entry("APPS = []", "APPS", "users");
        assert!(changed);
        assert_eq!(text, "APPS = [\n    \"users\",\n]");
    }

    #[test]
    fn test_add_to_comment_only_list() {
        let (text, changed) = add_list_entry(REGISTRY, "INSTALLED_APPS", "users");
        assert!(changed);
        assert_eq!(
            text,
            "INSTALLED_APPS: list[str] = [\n    # Add your apps here\n    \"users\",\n]\n"
        );
    }

    #[test]
    fn test_add_after_trailing_comma() {
        let source = "INSTALLED_APPS: list[str] = [\n    \"products\",\n]\n";
        let (text, _) = add_list_entry(source, "INSTALLED_APPS", "users");
        assert_eq!(
            text,
            "INSTALLED_APPS: list[str] = [\n    \"products\",\n    \"users\",\n]\n"
        );
    }

    #[test]
    fn test_add_after_missing_comma() {
        let source = "INSTALLED_APPS = [\n  \"products\"  # shop\n]\n";
        let (text, _) = add_list_entry(source, "INSTALLED_APPS", "users");
        assert_eq!(text, "INSTALLED_APPS = [\n  \"products\",  # shop\n  \"users\",\n]\n");
    }

    #[test]
    fn test_add_to_single_line_list() {
        let (text, _) = add_list_entry("APPS = [\"a\", \"b\"]\n", "APPS", "c");
        assert_eq!(text, "APPS = [\"a\", \"b\",\n    \"c\",\n]\n");
    }

    #[test]
    fn test_add_keeps_class_indentation() {
        let source = "class Settings:\n    APPS = []\n";
        let (text, _) = add_list_entry(source, "APPS", "users");
        assert_eq!(text, "class Settings:\n    APPS = [\n        \"users\",\n    ]\n");
    }

    #[test]
    fn test_add_is_idempotent() {
        let (once, _) = add_list_entry(REGISTRY, "INSTALLED_APPS", "users");
        let (twice, changed) = add_list_entry(&once, "INSTALLED_APPS", "users");
        assert!(changed);
        assert_eq!(once, twice);
        assert_eq!(twice.matches("\"users\"").count(), 1);
    }

    #[test]
    fn test_single_quoted_entry_counts_as_present() {
        let source = "INSTALLED_APPS: list[str] = [\n    'products',\n]\n";
        let (text, changed) = add_list_entry(source, "INSTALLED_APPS", "products");
        assert!(changed);
        assert_eq!(text, source);
    }

    #[test]
    fn test_missing_list_reports_not_found() {
        let (text, changed) = add_list_entry("OTHER = [\n]\n", "INSTALLED_APPS", "users");
        assert!(!changed);
        assert_eq!(text, "OTHER = [\n]\n");
    }

    #[test]
    fn test_prefixed_name_is_not_matched() {
        let (_, changed) = add_list_entry("MY_INSTALLED_APPS = []\n", "INSTALLED_APPS", "users");
        assert!(!changed);
    }

    #[test]
    fn test_nested_list_reports_not_found() {
        let source = "APPS = [\n    [\"a\"],\n]\n";
        let (text, changed) = add_list_entry(source, "APPS", "b");
        assert!(!changed);
        assert_eq!(text, source);
    }

    #[test]
    fn test_brackets_in_comments_are_ignored() {
        let source = "INSTALLED_APPS: list[str] = [\n    # Add apps here, e.g. [\"users\"]\n]\n";
        let (text, changed) = add_list_entry(source, "INSTALLED_APPS", "orders");
        assert!(changed);
        assert_eq!(
            text,
            "INSTALLED_APPS: list[str] = [\n    # Add apps here, e.g. [\"users\"]\n    \"orders\",\n]\n"
        );
        assert_eq!(list_entries(&text, "INSTALLED_APPS"), Some(vec!["orders".to_string()]));

        let source = "APPS = [\n    \"a\",  # see docs[1]\n]\n";
        let (text, changed) = add_list_entry(source, "APPS", "orders");
        assert!(changed);
        assert_eq!(text, "APPS = [\n    \"a\",  # see docs[1]\n    \"orders\",\n]\n");
    }

    #[test]
    fn test_brackets_in_strings_are_ignored() {
        let source = "APPS = [\"a]\", 'b[']\n";
        assert_eq!(list_entries(source, "APPS"), Some(vec![]));
        let (_, changed) = add_list_entry(source, "APPS", "c");
        assert!(changed);
    }

    #[test]
    fn test_unclosed_list_reports_not_found() {
        let source = "APPS = [\n    \"a\",\n";
        let (text, changed) = add_list_entry(source, "APPS", "b");
        assert!(!changed);
        assert_eq!(text, source);
        assert_eq!(list_entries(source, "APPS"), None);
    }

    #[test]
    fn test_add_keeps_crlf_line_endings() {
        let source = "INSTALLED_APPS = [\r\n    \"a\"\r\n]\r\n";
        let (text, changed) = add_list_entry(source, "INSTALLED_APPS", "orders");
        assert!(changed);
        assert_eq!(text, "INSTALLED_APPS = [\r\n    \"a\",\r\n    \"orders\",\r\n]\r\n");
    }

    #[test]
    fn test_list_entries_skips_comments() {
        let source = "INSTALLED_APPS: list[str] = [\n    \"users\",\n    # \"legacy\",\n    'orders',  # \"x\"\n]\n";
        assert_eq!(
            list_entries(source, "INSTALLED_APPS"),
            Some(vec!["users".to_string(), "orders".to_string()])
        );
        assert_eq!(list_entries("nothing", "INSTALLED_APPS"), None);
    }

    #[test]
    fn test_set_scalar_value() {
        let (text, changed) = set_scalar_value("DATABASE_ENGINE: str = \"sqlite\"", "DATABASE_ENGINE", "postgres");
        assert!(changed);
        assert_eq!(text, "DATABASE_ENGINE: str = \"postgres\"");
        assert!(!text.contains("sqlite"));
    }

    #[test]
    fn test_set_scalar_value_normalizes_quotes_and_keeps_spacing() {
        let (text, _) = set_scalar_value("DATABASE_ENGINE : str  =  'sqlite'", "DATABASE_ENGINE", "mysql");
        assert_eq!(text, "DATABASE_ENGINE : str  =  \"mysql\"");

        let (text, _) = set_scalar_value("ENGINE='a'", "ENGINE", "b");
        assert_eq!(text, "ENGINE=\"b\"");
    }

    #[test]
    fn test_set_scalar_value_not_found() {
        let (text, changed) = set_scalar_value("OTHER_SETTING = 'value'", "DATABASE_ENGINE", "postgres");
        assert!(!changed);
        assert_eq!(text, "OTHER_SETTING = 'value'");

        let (_, changed) = set_scalar_value("DATABASE_ENGINE = 3", "DATABASE_ENGINE", "postgres");
        assert!(!changed);
    }

    #[test]
    fn test_set_scalar_value_escapes() {
        let (text, _) = set_scalar_value("K = 'x'", "K", "a\"b$1");
        assert_eq!(text, "K = \"a\\\"b$1\"");
    }

    #[test]
    fn test_set_env_var_replaces_value_only() {
        let text = set_env_var("DATABASE_ENGINE=sqlite\nOTHER=value", "DATABASE_ENGINE", "postgres");
        assert_eq!(text, "DATABASE_ENGINE=postgres\nOTHER=value");
    }

    #[test]
    fn test_set_env_var_anchors_key() {
        let text = set_env_var("MY_DATABASE_URL=x\n", "DATABASE_URL", "sqlite:///./app.db");
        assert_eq!(text, "MY_DATABASE_URL=x\nDATABASE_URL=sqlite:///./app.db\n");
    }

    #[test]
    fn test_set_env_var_appends() {
        assert_eq!(set_env_var("", "KEY", "v"), "KEY=v\n");
        assert_eq!(set_env_var("A=1", "KEY", "v"), "A=1\nKEY=v\n");
        assert_eq!(set_env_var("A=1\n", "KEY", "v"), "A=1\nKEY=v\n");
    }

    #[test]
    fn test_set_env_var_keeps_crlf() {
        assert_eq!(set_env_var("KEY=old\r\nB=2\r\n", "KEY", "new"), "KEY=new\r\nB=2\r\n");
    }

    #[test]
    fn test_env_value() {
        assert_eq!(env_value("A=1\nSECRET_KEY=abc\n", "SECRET_KEY"), Some("abc"));
        assert_eq!(env_value("A=1", "SECRET_KEY"), None);
    }
}
