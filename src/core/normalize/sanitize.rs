//! Filesystem-safe name sanitizer
//!
//! Turns arbitrary text into a single path segment: no separators or
//! characters rejected by common filesystems, no control characters, no
//! leading/trailing dots or blanks, at most [`MAX_SEGMENT_CHARS`] characters,
//! and never empty. The transformation is idempotent.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder for empty or absent input
pub const UNKNOWN: &str = "Unknown";

/// Upper bound on a sanitized segment, in characters
pub const MAX_SEGMENT_CHARS: usize = 100;

fn illegal_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[<>:"/\\|?*,“”„«»\x00-\x08\x0B\x0C\x0E-\x1F\x7F]"#)
            .expect("illegal character class is a valid regex")
    })
}

fn line_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n\t]+").expect("line break class is a valid regex"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace class is a valid regex"))
}

/// Sanitize `input` into a filesystem-safe segment
///
/// # Examples
///
/// ```
/// use harvest::core::normalize::sanitize_name;
///
/// assert_eq!(sanitize_name("a/b: c?"), "a_b_ c_");
/// assert_eq!(sanitize_name("  ..hidden.  "), "hidden");
/// assert_eq!(sanitize_name(""), "Unknown");
/// ```
pub fn sanitize_name(input: &str) -> String {
    if input.is_empty() {
        return UNKNOWN.to_string();
    }

    let replaced = illegal_chars().replace_all(input, "_");
    let replaced = line_breaks().replace_all(&replaced, "_");
    let collapsed = whitespace_runs().replace_all(&replaced, " ");
    let trimmed = trim_edges(&collapsed);

    // Truncation can expose a trailing blank or dot, so trim again.
    let truncated: String = trimmed.chars().take(MAX_SEGMENT_CHARS).collect();
    let result = trim_edges(&truncated);

    if result.is_empty() {
        UNKNOWN.to_string()
    } else {
        result.to_string()
    }
}

/// [`sanitize_name`] for optional input
pub fn sanitize_opt(input: Option<&str>) -> String {
    sanitize_name(input.unwrap_or_default())
}

fn trim_edges(s: &str) -> &str {
    s.trim_matches(|c: char| c == '.' || c.is_whitespace())
}
