//! Document serialization: YAML frontmatter block followed by the body.

use inkport_shared::Document;

/// Render a document as the file the site generator reads.
///
/// ```text
/// ---
/// title: "..."
/// author: "..."
/// date: 2026-02-02
/// description: "..."
/// featuredImage: "..."      (optional)
/// blogTags:                 (optional)
///   - "..."
/// faqs:                     (optional)
///   - question: "..."
///     answer: "..."
/// ---
///
/// <body>
/// ```
pub fn render_document(doc: &Document) -> String {
    let mut lines = vec![
        "---".to_string(),
        format!("title: {}", yaml_str(&doc.title)),
        format!("author: {}", yaml_str(&doc.author)),
        format!("date: {}", doc.date.format("%Y-%m-%d")),
        format!("description: {}", yaml_str(&doc.description)),
    ];

    if let Some(image) = &doc.featured_image {
        lines.push(format!("featuredImage: {}", yaml_str(image)));
    }

    if !doc.tags.is_empty() {
        lines.push("blogTags:".to_string());
        for tag in &doc.tags {
            lines.push(format!("  - {}", yaml_str(tag)));
        }
    }

    if !doc.faqs.is_empty() {
        lines.push("faqs:".to_string());
        for faq in &doc.faqs {
            lines.push(format!("  - question: {}", yaml_str(&faq.question)));
            lines.push(format!("    answer: {}", yaml_str(&faq.answer)));
        }
    }

    lines.push("---".to_string());

    format!("{}\n\n{}\n", lines.join("\n"), doc.body)
}

/// Double-quoted YAML scalar. Every value is quoted, special characters or not.
pub fn yaml_str(value: &str) -> String {
    format!("\"{}\"", escape_yaml_string(value))
}

/// Escape characters that would end or corrupt a double-quoted scalar.
fn escape_yaml_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}
