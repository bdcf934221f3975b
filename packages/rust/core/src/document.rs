//! Per-row document construction.
//!
//! Turns one export record into a [`Document`] or the reason it is skipped.
//! Existence of the target file is checked later, by the pipeline.

use chrono::NaiveDate;
use inkport_csv::Record;
use inkport_markdown::{html_to_markdown, insert_cta};
use inkport_shared::{Document, FaqEntry, ImportConfig, SkipReason};

use crate::columns::ColumnMap;
use crate::fields::{author_display_name, is_usable_slug, resolve_publish_date, slugify};

/// Rows narrower than this are treated as malformed.
pub const MIN_FIELDS: usize = 5;

/// Build the document for `record`, or say why there is none.
///
/// `today` stands in for unparseable or missing publish dates.
pub fn build_document(
    record: &Record<'_>,
    columns: &ColumnMap,
    config: &ImportConfig,
    today: NaiveDate,
) -> std::result::Result<Document, SkipReason> {
    if record.width() < MIN_FIELDS {
        return Err(SkipReason::Malformed);
    }
    if record.flag(columns.archived) {
        return Err(SkipReason::Archived);
    }
    if !config.include_drafts && record.flag(columns.draft) {
        return Err(SkipReason::Draft);
    }

    let name = record.get(columns.name);
    let rich_text = record.get(columns.rich_text);
    if name.is_empty() && rich_text.is_empty() {
        return Err(SkipReason::MissingIdentity);
    }

    let slug = non_empty(record.get(columns.slug))
        .map(str::to_string)
        .unwrap_or_else(|| slugify(name));
    if !is_usable_slug(&slug) {
        return Err(SkipReason::InvalidSlug);
    }

    let title = non_empty(record.get(columns.meta_title)).unwrap_or(name);
    let description = non_empty(record.get(columns.meta_description))
        .unwrap_or_else(|| record.get(columns.summary));

    let body = insert_cta(&html_to_markdown(rich_text), &config.cta_marker);

    Ok(Document {
        slug,
        title: title.to_string(),
        author: author_display_name(record.get(columns.author), &config.default_author),
        date: resolve_publish_date(record.get(columns.publish_date), today),
        description: description.to_string(),
        featured_image: non_empty(record.get(columns.main_image)).map(str::to_string),
        tags: non_empty(record.get(columns.category))
            .map(|c| vec![c.to_string()])
            .unwrap_or_default(),
        faqs: collect_faqs(record, columns),
        body,
    })
}

/// FAQ slots are independent: an empty slot 3 does not hide slot 4.
fn collect_faqs(record: &Record<'_>, columns: &ColumnMap) -> Vec<FaqEntry> {
    columns
        .faqs
        .iter()
        .filter_map(|&(question, answer)| {
            let question = non_empty(record.get(question))?;
            Some(FaqEntry {
                question: question.to_string(),
                answer: record.get(answer).to_string(),
            })
        })
        .collect()
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkport_csv::{Table, parse_rows, write_row};
    use inkport_shared::AppConfig;

    const HEADER: &str = "Name,Slug,Archived,Draft,Meta Title,Authorr,Post Summary,Main Image,\
Publish date,Rich text,Meta Description,What is the Category?,\
FAQ Question 1,FAQ Answer 1,FAQ Question 2,FAQ Answer 2,FAQ Question 3,FAQ Answer 3,\
FAQ Question 4,FAQ Answer 4,FAQ Question 5,FAQ Answer 5";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn config() -> ImportConfig {
        ImportConfig::new("export.csv", &AppConfig::default())
    }

    /// Build a full-width row from `(column, value)` pairs.
    fn row(values: &[(&str, &str)]) -> String {
        let headers: Vec<&str> = HEADER.split(',').collect();
        let fields: Vec<String> = headers
            .iter()
            .map(|h| {
                values
                    .iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default()
            })
            .collect();
        write_row(&fields)
    }

    fn build_with(
        values: &[(&str, &str)],
        config: &ImportConfig,
    ) -> std::result::Result<Document, SkipReason> {
        let text = format!("{HEADER}\n{}\n", row(values));
        let table = Table::from_rows(parse_rows(&text)).unwrap();
        let columns = ColumnMap::resolve(&table, &config.columns);
        let record = table.records().next().unwrap();
        build_document(&record, &columns, config, today())
    }

    fn build(values: &[(&str, &str)]) -> std::result::Result<Document, SkipReason> {
        build_with(values, &config())
    }

    #[test]
    fn minimal_row_uses_fallbacks() {
        let doc = build(&[("Name", "Hello World"), ("Rich text", "<p>Hi</p>")]).unwrap();
        assert_eq!(doc.slug, "hello-world");
        assert_eq!(doc.title, "Hello World");
        assert_eq!(doc.author, "Colossyan Team");
        assert_eq!(doc.date, today());
        assert_eq!(doc.description, "");
        assert_eq!(doc.featured_image, None);
        assert!(doc.tags.is_empty());
        assert!(doc.faqs.is_empty());
        assert_eq!(doc.body, "Hi\n\n{% cta %}");
    }

    #[test]
    fn explicit_values_win() {
        let doc = build(&[
            ("Name", "Hello"),
            ("Slug", "custom-slug"),
            ("Meta Title", "Hello | Blog"),
            ("Authorr", "jane-doe"),
            ("Post Summary", "summary"),
            ("Meta Description", "meta"),
            ("Main Image", "https://cdn.example.com/hero.png"),
            ("Publish date", "2024-03-15T10:00:00.000Z"),
            ("What is the Category?", "Product"),
        ])
        .unwrap();
        assert_eq!(doc.slug, "custom-slug");
        assert_eq!(doc.title, "Hello | Blog");
        assert_eq!(doc.author, "Jane Doe");
        assert_eq!(doc.description, "meta");
        assert_eq!(doc.featured_image.as_deref(), Some("https://cdn.example.com/hero.png"));
        assert_eq!(doc.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(doc.tags, vec!["Product".to_string()]);
    }

    #[test]
    fn description_falls_back_to_summary() {
        let doc = build(&[("Name", "x"), ("Post Summary", "short summary")]).unwrap();
        assert_eq!(doc.description, "short summary");
    }

    #[test]
    fn archived_always_skips() {
        let mut cfg = config();
        cfg.include_drafts = true;
        let result = build_with(
            &[("Name", "x"), ("Archived", "true"), ("Draft", "false")],
            &cfg,
        );
        assert_eq!(result, Err(SkipReason::Archived));
    }

    #[test]
    fn draft_skips_unless_requested() {
        let values = [("Name", "x"), ("Draft", "true")];
        assert_eq!(build(&values), Err(SkipReason::Draft));

        let mut cfg = config();
        cfg.include_drafts = true;
        assert!(build_with(&values, &cfg).is_ok());
    }

    #[test]
    fn flag_must_be_exactly_true() {
        assert!(build(&[("Name", "x"), ("Archived", "TRUE")]).is_ok());
        assert!(build(&[("Name", "x"), ("Draft", "yes")]).is_ok());
    }

    #[test]
    fn missing_name_and_body_skips() {
        assert_eq!(
            build(&[("Slug", "orphan")]),
            Err(SkipReason::MissingIdentity)
        );
    }

    #[test]
    fn body_without_name_needs_a_slug() {
        assert_eq!(
            build(&[("Rich text", "<p>text</p>")]),
            Err(SkipReason::InvalidSlug)
        );
        assert!(build(&[("Slug", "s"), ("Rich text", "<p>text</p>")]).is_ok());
    }

    #[test]
    fn path_like_slug_is_rejected() {
        assert_eq!(
            build(&[("Name", "x"), ("Slug", "../escape")]),
            Err(SkipReason::InvalidSlug)
        );
    }

    #[test]
    fn narrow_row_is_malformed() {
        let cfg = config();
        let table = Table::from_rows(parse_rows("Name,Slug,Archived,Draft,Rich text\na,b,c,d\n")).unwrap();
        let columns = ColumnMap::resolve(&table, &cfg.columns);
        let record = table.records().next().unwrap();
        assert_eq!(
            build_document(&record, &columns, &cfg, today()),
            Err(SkipReason::Malformed)
        );
    }

    #[test]
    fn faq_gaps_do_not_stop_collection() {
        let doc = build(&[
            ("Name", "x"),
            ("FAQ Question 1", "Q1"),
            ("FAQ Answer 1", "A1"),
            ("FAQ Answer 3", "orphan answer"),
            ("FAQ Question 4", "Q4"),
            ("FAQ Question 5", "Q5"),
            ("FAQ Answer 5", "A5"),
        ])
        .unwrap();
        let questions: Vec<&str> = doc.faqs.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(questions, vec!["Q1", "Q4", "Q5"]);
        assert_eq!(doc.faqs[1].answer, "");
        assert_eq!(doc.faqs[2].answer, "A5");
    }

    #[test]
    fn body_gets_cta_after_second_section() {
        let doc = build(&[
            ("Name", "x"),
            (
                "Rich text",
                "<h2>One</h2><p>a</p><h2>Two</h2><p>b</p><h2>Three</h2><p>c</p>",
            ),
        ])
        .unwrap();
        assert_eq!(
            doc.body,
            "## One\n\na\n\n## Two\n\n{% cta %}\n\nb\n\n## Three\n\nc"
        );
    }

    #[test]
    fn configured_marker_and_author_are_used() {
        let mut cfg = config();
        cfg.cta_marker = "<!-- promo -->".into();
        cfg.default_author = "Editorial".into();
        let doc = build_with(&[("Name", "x")], &cfg).unwrap();
        assert_eq!(doc.body, "<!-- promo -->");
        assert_eq!(doc.author, "Editorial");
    }
}
