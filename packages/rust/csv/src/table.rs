//! Header-aligned view over parsed rows.
//!
//! Data rows are only ever read through a column looked up by header name,
//! so reordered exports keep working and absent columns read as empty.

/// Parsed export: a header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Split the first row off as the header. `None` for empty input.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let headers = rows
            .remove(0)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect();
        Some(Self { headers, rows })
    }

    /// Trimmed header names, in source order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of the first header equal to `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of the first candidate name that is present.
    pub fn first_column<S: AsRef<str>>(&self, names: &[S]) -> Option<usize> {
        names.iter().find_map(|n| self.column(n.as_ref()))
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows in source order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|fields| Record { fields })
    }
}

/// One data row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a [String],
}

impl<'a> Record<'a> {
    /// Raw field count, before any column lookup.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Trimmed value at `column`, or `""` when the column is absent or the
    /// row is too short to reach it.
    pub fn get(&self, column: Option<usize>) -> &'a str {
        column
            .and_then(|i| self.fields.get(i))
            .map(|f| f.trim())
            .unwrap_or("")
    }

    /// `true` only when the trimmed value is exactly `true`.
    pub fn flag(&self, column: Option<usize>) -> bool {
        self.get(column) == "true"
    }
}
