//! End-to-end import: export file → rows → documents → files on disk.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, instrument};

use inkport_csv::{Record, Table, parse_rows};
use inkport_shared::{ImportConfig, ImportSummary, InkportError, Result, RowOutcome, SkipReason};

use crate::columns::ColumnMap;
use crate::document::build_document;
use crate::frontmatter::render_document;

/// Progress callback for reporting import status.
pub trait ProgressReporter {
    /// Called once the export is parsed, before the first row.
    fn started(&self, total_rows: usize);
    /// Called after each data row, whatever its outcome.
    fn row_processed(&self, current: usize, total: usize);
    /// Called for every skipped row (1-based data-row number).
    fn row_skipped(&self, row: usize, reason: SkipReason);
    /// Called every `progress_every` created documents.
    fn milestone(&self, created: usize);
    /// Called when the run completes.
    fn done(&self, summary: &ImportSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn started(&self, _total_rows: usize) {}
    fn row_processed(&self, _current: usize, _total: usize) {}
    fn row_skipped(&self, _row: usize, _reason: SkipReason) {}
    fn milestone(&self, _created: usize) {}
    fn done(&self, _summary: &ImportSummary) {}
}

/// Run the full import described by `config`.
///
/// 1. Read and parse the export
/// 2. Resolve columns against the header row
/// 3. Build, check and write one document per qualifying row
///
/// Fails on an unreadable or empty export and on any failed write.
/// Skipped rows are counted, never errors.
#[instrument(skip_all, fields(input = %config.input_path.display()))]
pub fn run_import(
    config: &ImportConfig,
    progress: &dyn ProgressReporter,
) -> Result<ImportSummary> {
    config.validate()?;

    let table = read_export(&config.input_path)?;
    let today = Utc::now().date_naive();

    import_table(&table, config, today, progress)
}

/// Read and parse the export at `path`. It must hold at least one data row.
pub fn read_export(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).map_err(|e| InkportError::io(path, e))?;

    let table = Table::from_rows(parse_rows(&text))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| InkportError::EmptyInput {
            path: path.to_path_buf(),
        })?;

    info!(rows = table.len(), columns = table.headers().len(), "parsed export");
    Ok(table)
}

/// Import every data row of `table`, strictly in source order.
///
/// `today` is the fallback publish date for rows without a usable one.
pub fn import_table(
    table: &Table,
    config: &ImportConfig,
    today: NaiveDate,
    progress: &dyn ProgressReporter,
) -> Result<ImportSummary> {
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| InkportError::io(&config.output_dir, e))?;

    let columns = ColumnMap::resolve(table, &config.columns);
    let mut summary = ImportSummary::new(&config.output_dir);
    let total = table.len();

    progress.started(total);

    for (i, record) in table.records().enumerate() {
        let row = i + 1;
        let outcome = import_record(&record, &columns, config, today)?;

        match &outcome {
            RowOutcome::Created { slug, path } => {
                debug!(row, slug = %slug, path = %path.display(), "document written");
            }
            RowOutcome::Skipped(reason) => {
                debug!(row, %reason, "row skipped");
                progress.row_skipped(row, *reason);
            }
        }

        summary.record(&outcome);
        if matches!(outcome, RowOutcome::Created { .. })
            && summary.created % config.progress_every == 0
        {
            progress.milestone(summary.created);
        }
        progress.row_processed(row, total);
    }

    info!(
        created = summary.created,
        skipped = summary.skipped,
        output = %config.output_dir.display(),
        "import complete"
    );

    progress.done(&summary);
    Ok(summary)
}

/// Decide and, when created, write one row.
fn import_record(
    record: &Record<'_>,
    columns: &ColumnMap,
    config: &ImportConfig,
    today: NaiveDate,
) -> Result<RowOutcome> {
    let doc = match build_document(record, columns, config, today) {
        Ok(doc) => doc,
        Err(reason) => return Ok(RowOutcome::Skipped(reason)),
    };

    let path = document_path(config, &doc.slug);
    if !config.overwrite && path.exists() {
        return Ok(RowOutcome::Skipped(SkipReason::AlreadyExists));
    }

    std::fs::write(&path, render_document(&doc)).map_err(|e| InkportError::io(&path, e))?;

    Ok(RowOutcome::Created {
        slug: doc.slug,
        path,
    })
}

/// `<output_dir>/<slug>.<extension>`
pub fn document_path(config: &ImportConfig, slug: &str) -> PathBuf {
    config
        .output_dir
        .join(format!("{slug}.{}", config.extension))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
