//! Markup stripping for caller-supplied free-text fields.
//!
//! Descriptions and notes arrive from a rich-text client; we persist plain
//! text only. Tags are removed, entities for angle brackets are not
//! re-expanded, and runs of whitespace collapse to a single space.

use std::sync::OnceLock;

use regex::Regex;

fn tag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

fn whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Strip HTML/XML tags from `input` and collapse whitespace.
///
/// Returns the trimmed plain text; an input that was nothing but markup
/// comes back as an empty string, which callers treat as a validation
/// failure for required fields.
pub fn strip_markup(input: &str) -> String {
    let without_tags = tag_pattern().replace_all(input, " ");
    whitespace_pattern()
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// `true` if `input` still has content after markup stripping.
pub fn has_text_content(input: &str) -> bool {
    !strip_markup(input).is_empty()
}
