//! HTML-to-Markdown conversion for rich-text export fields.
//!
//! The exported rich text is a small, shallow HTML dialect, so conversion is
//! an ordered list of pattern rewrites rather than a DOM walk. Anything the
//! passes don't recognise is stripped down to its text; conversion never fails.

mod passes;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

/// Convert one rich-text HTML fragment to Markdown.
///
/// Handles figures and images, `h2`–`h4`, bold/italic, links, ordered and
/// unordered lists, tables, blockquotes, `<br>`, paragraphs and `<div>`
/// wrappers, then strips leftover tags, decodes common entities and
/// collapses blank-line runs. Stateless: equal input gives equal output.
pub fn html_to_markdown(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let markdown = passes::run_pipeline(html);
    debug!(html_len = html.len(), md_len = markdown.len(), "rich text converted");
    markdown
}

// ---------------------------------------------------------------------------
// Promo marker injection
// ---------------------------------------------------------------------------

/// Matches a top-level section heading (`## ...`) on its own line.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## .+$").expect("valid regex"));

/// Number of top-level section headings in `markdown`.
pub fn count_sections(markdown: &str) -> usize {
    SECTION_RE.find_iter(markdown).count()
}

/// Place `marker` right after the second `## ` heading, or at the end of the
/// body when there are fewer than two.
pub fn insert_cta(markdown: &str, marker: &str) -> String {
    if let Some(second) = SECTION_RE.find_iter(markdown).nth(1) {
        let at = second.end();
        return format!("{}\n\n{marker}{}", &markdown[..at], &markdown[at..]);
    }

    if markdown.is_empty() {
        marker.to_string()
    } else {
        format!("{markdown}\n\n{marker}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CTA: &str = "{% cta %}";

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    // --- Core conversion tests ---

    #[test]
    fn convert_paragraph_with_bold() {
        let md = html_to_markdown("<p>Hi <strong>there</strong></p>");
        assert_eq!(md, "Hi **there**");
    }

    #[test]
    fn convert_empty_input() {
        assert_eq!(html_to_markdown(""), "");
    }

    #[test]
    fn convert_unordered_list() {
        let md = html_to_markdown("<ul><li>A</li><li>B</li></ul>");
        assert_eq!(md, "- A\n- B");
    }

    #[test]
    fn convert_list_with_inline_markup() {
        let md = html_to_markdown(
            r#"<ul><li><strong>Fast:</strong> see <a href="https://example.com">docs</a></li></ul>"#,
        );
        assert_eq!(md, "- **Fast:** see [docs](https://example.com)");
    }

    #[test]
    fn convert_headings_are_separated() {
        let md = html_to_markdown("<p>Intro</p><h2>Why</h2><p>Because</p><h3>Detail</h3>");
        assert_eq!(md, "Intro\n\n## Why\n\nBecause\n\n### Detail");
    }

    #[test]
    fn convert_table_with_short_row() {
        let md = html_to_markdown(
            "<table><tr><th>Plan</th><th>Price</th></tr><tr><td>Free</td></tr></table>",
        );
        assert_eq!(md, "| Plan | Price |\n| --- | --- |\n| Free |  |");
    }

    #[test]
    fn convert_blockquote_with_paragraphs() {
        let md = html_to_markdown("<blockquote><p>Quoted <em>line</em></p></blockquote>");
        assert_eq!(md, "> Quoted *line*");
    }

    #[test]
    fn convert_line_breaks_inside_paragraph() {
        let md = html_to_markdown("<p>one<br>two<br/>three</p>");
        assert_eq!(md, "one\ntwo\nthree");
    }

    #[test]
    fn convert_strips_unknown_tags_keeps_text() {
        let md = html_to_markdown("<section><span class=\"x\">kept</span> <u>too</u></section>");
        assert_eq!(md, "kept too");
    }

    #[test]
    fn convert_decodes_entities_after_stripping() {
        let md = html_to_markdown("<p>a &lt;tag&gt; &amp; it&rsquo;s&nbsp;fine</p>");
        assert_eq!(md, "a <tag> & it's fine");
    }

    #[test]
    fn convert_figure_to_image_line() {
        let md = html_to_markdown(
            r#"<p>Before</p><figure class="w-richtext-align-fullwidth"><div><img src="https://cdn.example.com/x.webp" alt="Diagram"></div></figure><p>After</p>"#,
        );
        assert_eq!(
            md,
            "Before\n\n![Diagram](https://cdn.example.com/x.webp)\n\nAfter"
        );
    }

    #[test]
    fn convert_normalizes_crlf() {
        let md = html_to_markdown("<p>a</p>\r\n<p>b</p>\r\n");
        assert!(!md.contains('\r'));
        assert_eq!(md, "a\n\nb");
    }

    #[test]
    fn convert_is_deterministic() {
        let html = load_fixture("html/rich-text.html");
        assert_eq!(html_to_markdown(&html), html_to_markdown(&html));
    }

    #[test]
    fn convert_rich_text_fixture() {
        let html = load_fixture("html/rich-text.html");
        let md = html_to_markdown(&html);

        assert!(md.starts_with("AI video is changing"));
        assert!(md.contains("## What is an AI avatar?"));
        assert!(md.contains("### Getting started"));
        assert!(md.contains("![Avatar studio](https://cdn.example.com/studio.png)"));
        assert!(md.contains("- **Scale:** produce in 70+ languages"));
        assert!(md.contains("1. Pick a template\n2. Write a script\n3. Export"));
        assert!(md.contains("| Feature | Free | Pro |"));
        assert!(md.contains("| Avatars | 3 |  |"));
        assert!(md.contains("> Training used to take weeks.\n> Now it takes an afternoon."));
        assert!(md.contains("[our pricing page](https://example.com/pricing)"));
        assert!(md.contains("\u{2014}"));
        assert!(!md.contains('<'), "leftover markup in: {md}");
        assert!(!md.contains("\n\n\n"));
    }

    // --- Promo marker ---

    #[test]
    fn cta_appended_without_sections() {
        assert_eq!(insert_cta("Just text.", CTA), "Just text.\n\n{% cta %}");
    }

    #[test]
    fn cta_appended_with_one_section() {
        let md = "## Only\n\nBody";
        assert_eq!(insert_cta(md, CTA), "## Only\n\nBody\n\n{% cta %}");
    }

    #[test]
    fn cta_after_second_of_three_sections() {
        let md = "## One\n\nA\n\n## Two\n\nB\n\n## Three\n\nC";
        let out = insert_cta(md, CTA);
        assert_eq!(out, "## One\n\nA\n\n## Two\n\n{% cta %}\n\nB\n\n## Three\n\nC");
        assert_eq!(out.matches(CTA).count(), 1);
    }

    #[test]
    fn cta_ignores_deeper_headings() {
        let md = "### Sub\n\n#### Deeper\n\n## Top";
        assert_eq!(count_sections(md), 1);
        assert!(insert_cta(md, CTA).ends_with("## Top\n\n{% cta %}"));
    }

    #[test]
    fn cta_on_empty_body() {
        assert_eq!(insert_cta("", CTA), "{% cta %}");
    }
}
