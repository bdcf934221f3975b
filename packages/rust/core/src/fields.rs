//! Derived field values: slugs, author display names, publish dates.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// Derive a URL/filename slug from a title.
///
/// `"What's New in 2.0?"` becomes `whats-new-in-20`.
pub fn slugify(text: &str) -> String {
    static APOSTROPHE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"['‘’]").expect("valid regex"));
    static DISALLOWED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid regex"));
    static WHITESPACE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
    static DASHES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

    let lower = text.to_lowercase();
    let s = APOSTROPHE_RE.replace_all(&lower, "");
    let s = DISALLOWED_RE.replace_all(&s, "");
    let s = WHITESPACE_RE.replace_all(&s, "-");
    let s = DASHES_RE.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

/// Whether `slug` names a plain file inside the output directory.
pub fn is_usable_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\'])
}

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

/// Turn an author identifier like `jane-doe` into `Jane Doe`.
///
/// Falls back to `default` when the identifier is empty.
pub fn author_display_name(id: &str, default: &str) -> String {
    if id.is_empty() {
        return default.to_string();
    }

    let mut out = String::with_capacity(id.len());
    let mut prev_word = false;
    for ch in id.chars() {
        let ch = if ch == '-' { ' ' } else { ch };
        let is_word = ch.is_alphanumeric() || ch == '_';
        if is_word && !prev_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_word = is_word;
    }
    out
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse an exported publish date into a UTC calendar date.
///
/// Returns `None` for empty or unrecognised input.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    // `Date.prototype.toString()`: `Mon Feb 02 2026 09:30:00 GMT+0100 (Central European Standard Time)`
    let without_zone_name = raw.split(" (").next().unwrap_or(raw);
    if let Ok(dt) = DateTime::parse_from_str(without_zone_name, "%a %b %d %Y %H:%M:%S GMT%z") {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y"];
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// [`parse_publish_date`], falling back to `today` for anything unparseable.
pub fn resolve_publish_date(raw: &str, today: NaiveDate) -> NaiveDate {
    parse_publish_date(raw).unwrap_or(today)
}
