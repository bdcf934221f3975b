//! Delimited-text reading for spreadsheet-style exports.
//!
//! [`parse_rows`] turns raw text into rows of fields; [`Table`] aligns data
//! rows to the header row so callers look values up by column name.

mod reader;
mod table;

pub use reader::{DELIMITER, QUOTE, parse_rows, quote_field, write_row};
pub use table::{Record, Table};
