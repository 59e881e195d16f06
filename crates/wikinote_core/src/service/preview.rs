//! Plain-text previews of editor HTML content.
//!
//! # Responsibility
//! - Derive short list-view snippets from rich-text markup.
//!
//! # Invariants
//! - Output never contains markup tags or line breaks.
//! - Output is at most `PREVIEW_MAX_CHARS` characters.

use once_cell::sync::Lazy;
use regex::Regex;

const PREVIEW_MAX_CHARS: usize = 100;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const HTML_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    // Must stay last so decoded `&` cannot form a new entity.
    ("&amp;", "&"),
];

/// Derives a plain-text preview from editor HTML.
///
/// Rules:
/// - tags are replaced by spaces, so adjacent blocks stay separated.
/// - common named entities are decoded.
/// - whitespace is collapsed and trimmed; the first 100 chars are kept.
///
/// Returns `None` when no visible text remains.
pub fn derive_html_preview(content: &str) -> Option<String> {
    let without_tags = HTML_TAG_RE.replace_all(content, " ");
    let mut decoded = without_tags.into_owned();
    for (entity, replacement) in HTML_ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    let normalized = WHITESPACE_RE.replace_all(&decoded, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(PREVIEW_MAX_CHARS).collect())
    }
}
