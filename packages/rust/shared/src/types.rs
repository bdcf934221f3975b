//! Core domain types for imported posts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A question/answer pair attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    /// May be empty; only the question decides inclusion.
    pub answer: String,
}

/// One generated post: frontmatter fields plus a Markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Filename-safe identifier; the file is `<slug>.<ext>`.
    pub slug: String,
    pub title: String,
    /// Display name, e.g. `Jane Doe`.
    pub author: String,
    /// Publish date (calendar date, no time component).
    pub date: NaiveDate,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// At most one entry today, taken from the category column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faqs: Vec<FaqEntry>,
    /// Converted Markdown body, promo marker already injected.
    pub body: String,
}

// ---------------------------------------------------------------------------
// Row outcomes
// ---------------------------------------------------------------------------

/// Why a row did not produce a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than five fields in the row.
    Malformed,
    /// Archived flag set.
    Archived,
    /// Draft flag set and drafts were not requested.
    Draft,
    /// Both the name and the body are empty.
    MissingIdentity,
    /// The slug cannot name a file inside the output directory.
    InvalidSlug,
    /// A document with this slug exists and overwrite was not requested.
    AlreadyExists,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Malformed => "malformed row",
            Self::Archived => "archived",
            Self::Draft => "draft",
            Self::MissingIdentity => "no name or body",
            Self::InvalidSlug => "invalid slug",
            Self::AlreadyExists => "already exists",
        };
        f.write_str(label)
    }
}

/// Terminal state of one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created { slug: String, path: PathBuf },
    Skipped(SkipReason),
}

// ---------------------------------------------------------------------------
// ImportSummary
// ---------------------------------------------------------------------------

/// Aggregate result of one import run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Documents written.
    pub created: usize,
    /// Rows that produced no document.
    pub skipped: usize,
    /// Skipped rows broken down by reason.
    #[serde(default)]
    pub skipped_by: BTreeMap<SkipReason, usize>,
    /// Directory the documents were written into.
    pub output_dir: PathBuf,
}

impl ImportSummary {
    /// Start an empty summary for `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Fold one row outcome into the counters.
    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Created { .. } => self.created += 1,
            RowOutcome::Skipped(reason) => {
                self.skipped += 1;
                *self.skipped_by.entry(*reason).or_default() += 1;
            }
        }
    }
}
