//! Resolution of configured column names against an export's header row.

use inkport_csv::Table;
use inkport_shared::{ColumnsConfig, FAQ_SLOTS};
use tracing::debug;

/// Header positions for every column the importer reads.
///
/// `None` means the export has no such column; reads then yield `""`.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub slug: Option<usize>,
    pub archived: Option<usize>,
    pub draft: Option<usize>,
    pub meta_title: Option<usize>,
    pub author: Option<usize>,
    pub summary: Option<usize>,
    pub main_image: Option<usize>,
    pub publish_date: Option<usize>,
    pub rich_text: Option<usize>,
    pub meta_description: Option<usize>,
    pub category: Option<usize>,
    /// (question, answer) positions for FAQ slots 1..=5.
    pub faqs: [(Option<usize>, Option<usize>); FAQ_SLOTS],
}

impl ColumnMap {
    /// Look every configured column up in `table`'s header row.
    pub fn resolve(table: &Table, columns: &ColumnsConfig) -> Self {
        let faqs = std::array::from_fn(|i| {
            (
                table.column(&columns.faq_question(i + 1)),
                table.column(&columns.faq_answer(i + 1)),
            )
        });

        let map = Self {
            name: table.column(&columns.name),
            slug: table.column(&columns.slug),
            archived: table.column(&columns.archived),
            draft: table.column(&columns.draft),
            meta_title: table.column(&columns.meta_title),
            author: table.first_column(columns.author.as_slice()),
            summary: table.column(&columns.summary),
            main_image: table.column(&columns.main_image),
            publish_date: table.column(&columns.publish_date),
            rich_text: table.column(&columns.rich_text),
            meta_description: table.column(&columns.meta_description),
            category: table.column(&columns.category),
            faqs,
        };

        let missing = map.missing(columns);
        if !missing.is_empty() {
            debug!(?missing, "columns absent from export, reading as empty");
        }
        map
    }

    /// Configured names of the single-value columns that were not found.
    fn missing<'a>(&self, columns: &'a ColumnsConfig) -> Vec<&'a str> {
        let author = columns.author.first().map(String::as_str).unwrap_or("author");
        [
            (self.name, columns.name.as_str()),
            (self.slug, columns.slug.as_str()),
            (self.archived, columns.archived.as_str()),
            (self.draft, columns.draft.as_str()),
            (self.meta_title, columns.meta_title.as_str()),
            (self.author, author),
            (self.summary, columns.summary.as_str()),
            (self.main_image, columns.main_image.as_str()),
            (self.publish_date, columns.publish_date.as_str()),
            (self.rich_text, columns.rich_text.as_str()),
            (self.meta_description, columns.meta_description.as_str()),
            (self.category, columns.category.as_str()),
        ]
        .into_iter()
        .filter(|(pos, _)| pos.is_none())
        .map(|(_, name)| name)
        .collect()
    }
}
