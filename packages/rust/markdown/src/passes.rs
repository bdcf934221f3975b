//! Ordered HTML-to-Markdown rewrite passes.
//!
//! Each pass is a function `&str -> String` applied in sequence. Later passes
//! rely on earlier ones: images are rewritten before the catch-all strip,
//! inline markup before tables flatten their cells, and so on. Rewritten
//! output never contains `<...>`, so no later pass can touch it again.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A named rewrite pass.
pub(crate) type Pass = (&'static str, fn(&str) -> String);

/// The pipeline, in application order.
pub(crate) const PASSES: &[Pass] = &[
    ("normalize_newlines", normalize_newlines),
    ("figures", convert_figures),
    ("images", convert_images),
    ("headings", convert_headings),
    ("emphasis", convert_emphasis),
    ("links", convert_links),
    ("unordered_lists", convert_unordered_lists),
    ("ordered_lists", convert_ordered_lists),
    ("tables", convert_tables),
    ("blockquotes", convert_blockquotes),
    ("line_breaks", convert_line_breaks),
    ("paragraphs", convert_paragraphs),
    ("containers", strip_containers),
    ("leftover_tags", strip_tags),
    ("entities", decode_entities),
    ("blank_lines", collapse_blank_lines),
];

/// Run every pass over `html`.
pub(crate) fn run_pipeline(html: &str) -> String {
    let mut result = html.to_string();
    for (name, pass) in PASSES {
        result = pass(&result);
        tracing::trace!(pass = name, len = result.len(), "pass applied");
    }
    result
}

// ---------------------------------------------------------------------------
// Shared patterns
// ---------------------------------------------------------------------------

/// Any tag, opening or closing.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<img\b([^>]*)>").expect("valid regex"));

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\b[^>]*>").expect("valid regex"));

static LI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li>").expect("valid regex"));

/// Value of attribute `name` inside an opening tag's attribute text.
fn attr<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    static SRC_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("src"));
    static ALT_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("alt"));
    static HREF_RE: LazyLock<Regex> = LazyLock::new(|| attr_regex("href"));

    let re = match name {
        "src" => &SRC_RE,
        "alt" => &ALT_RE,
        "href" => &HREF_RE,
        _ => return None,
    };
    re.captures(attrs)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str())
}

fn attr_regex(name: &str) -> Regex {
    Regex::new(&format!(
        r#"(?is)(?:^|\s){name}\s*=\s*(?:"([^"]*)"|'([^']*)')"#
    ))
    .expect("valid regex")
}

/// Markdown image reference for an `<img>` attribute string, if it has a `src`.
fn image_reference(attrs: &str) -> Option<String> {
    let src = attr(attrs, "src")?;
    let alt = attr(attrs, "alt").unwrap_or("");
    Some(format!("![{alt}]({src})"))
}

/// Drop every tag, keeping the text between them.
fn plain_text(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 1: Line terminators
// ---------------------------------------------------------------------------

fn normalize_newlines(html: &str) -> String {
    html.replace("\r\n", "\n").replace('\r', "\n")
}

// ---------------------------------------------------------------------------
// Pass 2-3: Images
// ---------------------------------------------------------------------------

/// Replace `<figure>` blocks wrapping an image with a standalone image line.
///
/// Captions and other figure content are dropped.
fn convert_figures(html: &str) -> String {
    static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<figure\b[^>]*>(.*?)</figure>").expect("valid regex")
    });

    FIGURE_RE
        .replace_all(html, |caps: &Captures| {
            IMG_RE
                .captures(&caps[1])
                .and_then(|img| image_reference(&img[1]))
                .map(|image| format!("\n\n{image}\n\n"))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace bare `<img>` tags, whatever the attribute order.
fn convert_images(html: &str) -> String {
    IMG_RE
        .replace_all(html, |caps: &Captures| {
            image_reference(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 4: Headings
// ---------------------------------------------------------------------------

fn convert_headings(html: &str) -> String {
    static HEADING_RES: LazyLock<[(Regex, &str); 3]> = LazyLock::new(|| {
        ["2", "3", "4"].map(|level| {
            let re = Regex::new(&format!(r"(?is)<h{level}\b[^>]*>(.*?)</h{level}>"))
                .expect("valid regex");
            let hashes = match level {
                "2" => "##",
                "3" => "###",
                _ => "####",
            };
            (re, hashes)
        })
    });

    let mut result = html.to_string();
    for (re, hashes) in HEADING_RES.iter() {
        result = re
            .replace_all(&result, |caps: &Captures| {
                format!("\n\n{hashes} {}\n\n", caps[1].trim())
            })
            .into_owned();
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 5: Bold and italic
// ---------------------------------------------------------------------------

fn convert_emphasis(html: &str) -> String {
    static EMPHASIS_RES: LazyLock<[(Regex, &str); 4]> = LazyLock::new(|| {
        [("strong", "**"), ("b", "**"), ("em", "*"), ("i", "*")].map(|(tag, marker)| {
            let re = Regex::new(&format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}>"))
                .expect("valid regex");
            (re, marker)
        })
    });

    let mut result = html.to_string();
    for (re, marker) in EMPHASIS_RES.iter() {
        result = re
            .replace_all(&result, |caps: &Captures| format!("{marker}{}{marker}", &caps[1]))
            .into_owned();
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 6: Links
// ---------------------------------------------------------------------------

/// `<a href="u">text</a>` becomes `[text](u)`; an anchor without `href`
/// keeps only its text.
fn convert_links(html: &str) -> String {
    static LINK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a>").expect("valid regex"));

    LINK_RE
        .replace_all(html, |caps: &Captures| match attr(&caps[1], "href") {
            Some(href) => format!("[{}]({href})", &caps[2]),
            None => caps[2].to_string(),
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 7-8: Lists
// ---------------------------------------------------------------------------

fn convert_unordered_lists(html: &str) -> String {
    static UL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<ul\b[^>]*>(.*?)</ul>").expect("valid regex"));

    UL_RE
        .replace_all(html, |caps: &Captures| {
            let items: String = LI_RE
                .captures_iter(&caps[1])
                .map(|item| format!("- {}\n", item[1].trim()))
                .collect();
            format!("\n\n{items}\n")
        })
        .into_owned()
}

/// Numbering restarts at 1 for every list.
fn convert_ordered_lists(html: &str) -> String {
    static OL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<ol\b[^>]*>(.*?)</ol>").expect("valid regex"));

    OL_RE
        .replace_all(html, |caps: &Captures| {
            let items: String = LI_RE
                .captures_iter(&caps[1])
                .enumerate()
                .map(|(i, item)| format!("{}. {}\n", i + 1, item[1].trim()))
                .collect();
            format!("\n\n{items}\n")
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 9: Tables
// ---------------------------------------------------------------------------

fn convert_tables(html: &str) -> String {
    static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<table\b[^>]*>(.*?)</table>").expect("valid regex")
    });

    TABLE_RE
        .replace_all(html, |caps: &Captures| table_to_markdown(&caps[1]))
        .into_owned()
}

/// Render the inside of a `<table>` as a pipe table.
///
/// Every row is padded to the widest row; a separator follows the first row.
fn table_to_markdown(inner: &str) -> String {
    static TR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").expect("valid regex"));
    static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<t[dh]\b[^>]*>(.*?)</t[dh]>").expect("valid regex")
    });

    let mut rows: Vec<Vec<String>> = TR_RE
        .captures_iter(inner)
        .map(|row| {
            CELL_RE
                .captures_iter(&row[1])
                .map(|cell| table_cell(&cell[1]))
                .collect()
        })
        .collect();

    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return String::new();
    }

    for row in &mut rows {
        row.resize(col_count, String::new());
    }

    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| format!("| {} |", row.join(" | ")))
        .collect();
    let separator = format!("| {} |", vec!["---"; col_count].join(" | "));
    lines.insert(1, separator);

    format!("\n\n{}\n\n", lines.join("\n"))
}

/// Cell text on a single line, with pipes escaped.
fn table_cell(html: &str) -> String {
    plain_text(html)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

// ---------------------------------------------------------------------------
// Pass 10: Blockquotes
// ---------------------------------------------------------------------------

fn convert_blockquotes(html: &str) -> String {
    static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?is)<blockquote\b[^>]*>(.*?)</blockquote>").expect("valid regex")
    });

    QUOTE_RE
        .replace_all(html, |caps: &Captures| {
            let with_breaks = BR_RE.replace_all(&caps[1], "\n");
            let text = plain_text(&with_breaks);
            let quoted = text
                .trim()
                .split('\n')
                .map(|line| format!("> {}", line.trim()))
                .collect::<Vec<_>>()
                .join("\n");
            format!("\n\n{quoted}\n\n")
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 11-12: Line breaks and paragraphs
// ---------------------------------------------------------------------------

fn convert_line_breaks(html: &str) -> String {
    BR_RE.replace_all(html, "\n").into_owned()
}

fn convert_paragraphs(html: &str) -> String {
    static P_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid regex"));

    P_RE.replace_all(html, "\n\n${1}\n\n").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 13-14: Stripping
// ---------------------------------------------------------------------------

/// Remove `<div>` wrappers, keeping their content in place.
fn strip_containers(html: &str) -> String {
    static DIV_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)</?div\b[^>]*>").expect("valid regex"));

    DIV_RE.replace_all(html, "").into_owned()
}

/// Catch-all for tags no earlier pass handled.
fn strip_tags(html: &str) -> String {
    static ANY_TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

    ANY_TAG_RE.replace_all(html, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 15: Entities
// ---------------------------------------------------------------------------

/// Decode the fixed entity table in one pass, so `&amp;lt;` yields `&lt;`.
fn decode_entities(text: &str) -> String {
    static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"&(amp|lt|gt|quot|#39|rsquo|lsquo|rdquo|ldquo|mdash|ndash|nbsp|hellip);")
            .expect("valid regex")
    });

    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let decoded = match &caps[1] {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" | "rdquo" | "ldquo" => "\"",
                "#39" | "rsquo" | "lsquo" => "'",
                "mdash" => "\u{2014}",
                "ndash" => "\u{2013}",
                "nbsp" => " ",
                "hellip" => "\u{2026}",
                _ => &caps[0],
            };
            decoded.to_string()
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Pass 16: Blank lines
// ---------------------------------------------------------------------------

/// Collapse runs of blank (or whitespace-only) lines to one, then trim.
fn collapse_blank_lines(text: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("valid regex"));

    MULTI_BLANK_RE
        .replace_all(text, "\n\n")
        .trim()
        .to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
