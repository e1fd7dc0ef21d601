//! Shared helpers for turning upstream records into [`Artwork`](crate::artwork::Artwork)s.
//!
//! Each source keeps its own `normalize` next to its record type; these are
//! the defensive readers they all share.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    // last, so "&amp;lt;" decodes to "&lt;" and not "<"
    ("&amp;", "&"),
];

/// The value if present and non-empty, otherwise `fallback`.
pub fn text_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

/// Optional field that treats an empty string as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Strip markup from a free-text field, leaving plain text.
pub fn strip_html(html: &str) -> String {
    let mut text = TAG.replace_all(html, "").into_owned();
    for (entity, replacement) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, replacement);
        }
    }
    text.trim().to_string()
}

/// Plain-text description, or empty when the source has none.
pub fn description(value: Option<String>) -> String {
    value.map(|html| strip_html(&html)).unwrap_or_default()
}
