//! Organization display-name extraction
//!
//! Legal-entity names usually wrap the brand in quotes, e.g.
//! `MCHJ "ABC Trading" filial`. The quoted part is the display name; without
//! quotes the whole field is used.

use regex::Regex;
use std::sync::OnceLock;

/// Placeholder for empty or absent organization names
pub const NO_ORGANIZATION: &str = "No Organization";

fn quoted() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""([^"]+)"|«([^»]+)»|“([^”]+)”"#).expect("quoted-name pattern is valid")
    })
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace class is a valid regex"))
}

/// Extract the display name from a raw organization field
///
/// # Examples
///
/// ```
/// use harvest::core::normalize::extract_org_name;
///
/// assert_eq!(extract_org_name(Some(r#"MCHJ "ABC Trading" filial"#)), "ABC Trading");
/// assert_eq!(extract_org_name(Some("ABC Trading")), "ABC Trading");
/// assert_eq!(extract_org_name(None), "No Organization");
/// ```
pub fn extract_org_name(raw: Option<&str>) -> String {
    let raw = raw.unwrap_or_default();

    let from_quotes = quoted()
        .captures(raw)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| collapse(m.as_str()))
        .filter(|name| !name.is_empty());

    let name = from_quotes.unwrap_or_else(|| collapse(raw));
    if name.is_empty() {
        NO_ORGANIZATION.to_string()
    } else {
        name
    }
}

fn collapse(s: &str) -> String {
    // `\s` already covers newlines and tabs, which become single spaces.
    whitespace_runs().replace_all(s, " ").trim().to_string()
}
