//! Lenient comma-separated parser.
//!
//! One forward scan over the input, no backtracking and no hard failures:
//! whatever is left at end of text is flushed as the last field.

use std::iter::Peekable;
use std::str::Chars;

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Quote character.
pub const QUOTE: char = '"';

const BOM: char = '\u{feff}';

/// Parse `text` into rows of fields, in source order.
///
/// Quoted fields may contain delimiters, `\r`, `\n` and doubled quotes.
/// Blank lines are dropped. Both `\n` and `\r\n` end a row.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let mut chars = text.chars().peekable();
    let mut rows = Vec::new();

    while chars.peek().is_some() {
        let mut row = Vec::new();
        loop {
            row.push(parse_field(&mut chars));
            if chars.next_if_eq(&DELIMITER).is_some() {
                continue;
            }
            break;
        }

        // Consume the terminator: `\r`, `\n` or `\r\n`.
        chars.next_if_eq(&'\r');
        chars.next_if_eq(&'\n');

        if row.len() > 1 || !row[0].is_empty() {
            rows.push(row);
        }
    }

    tracing::trace!(rows = rows.len(), "parsed delimited text");
    rows
}

/// Read one field, leaving the iterator on the delimiter, the terminator,
/// or end of input.
fn parse_field(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut field = String::new();

    if chars.next_if_eq(&QUOTE).is_some() {
        while let Some(ch) = chars.next() {
            if ch == QUOTE {
                if chars.next_if_eq(&QUOTE).is_some() {
                    field.push(QUOTE);
                } else {
                    break;
                }
            } else {
                field.push(ch);
            }
        }
    }

    // Unquoted content, or stray text after a closing quote.
    while let Some(ch) = chars.next_if(|c| !is_structural(*c)) {
        field.push(ch);
    }

    field
}

fn is_structural(ch: char) -> bool {
    ch == DELIMITER || ch == '\n' || ch == '\r'
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Quote a single field, doubling embedded quotes.
///
/// Always quotes, so the output is valid whatever the content.
pub fn quote_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(QUOTE);
    for ch in value.chars() {
        if ch == QUOTE {
            out.push(QUOTE);
        }
        out.push(ch);
    }
    out.push(QUOTE);
    out
}

/// Render one row as a delimited line, without the trailing terminator.
pub fn write_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(&DELIMITER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn parses_simple_rows() {
        let rows = parse_rows("a,b,c\n1,2,3\n");
        assert_eq!(rows, vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])]);
    }

    #[test]
    fn crlf_and_lf_are_equivalent() {
        let lf = parse_rows("a,b\n1,2\n");
        let crlf = parse_rows("a,b\r\n1,2\r\n");
        assert_eq!(lf, crlf);
    }

    #[test]
    fn bare_cr_ends_a_row() {
        let rows = parse_rows("a,b\r1,2");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["1", "2"])]);
    }

    #[test]
    fn quoted_field_keeps_delimiters_and_newlines() {
        let rows = parse_rows("name,body\nx,\"one, two\nthree\r\nfour\"\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][1], "one, two\nthree\r\nfour");
    }

    #[test]
    fn doubled_quote_is_literal() {
        let rows = parse_rows("\"say \"\"hi\"\"\",b");
        assert_eq!(rows, vec![row(&["say \"hi\"", "b"])]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let rows = parse_rows("a,b\n\n\n1,2\n\n");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["1", "2"])]);
    }

    #[test]
    fn row_of_empty_fields_is_kept() {
        let rows = parse_rows("a,b\n,\n");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["", ""])]);
    }

    #[test]
    fn trailing_delimiter_yields_empty_field() {
        let rows = parse_rows("a,b,\n");
        assert_eq!(rows, vec![row(&["a", "b", ""])]);
    }

    #[test]
    fn no_trailing_newline() {
        let rows = parse_rows("a,b\n1,2");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], row(&["1", "2"]));
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let rows = parse_rows("a,\"open field\nstill open");
        assert_eq!(rows, vec![row(&["a", "open field\nstill open"])]);
    }

    #[test]
    fn text_after_closing_quote_is_appended() {
        let rows = parse_rows("\"abc\"def,g\n");
        assert_eq!(rows, vec![row(&["abcdef", "g"])]);
    }

    #[test]
    fn quote_inside_unquoted_field_is_literal() {
        let rows = parse_rows("5\" screen,b\n");
        assert_eq!(rows, vec![row(&["5\" screen", "b"])]);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let rows = parse_rows("\u{feff}Name,Slug\nx,y\n");
        assert_eq!(rows[0][0], "Name");
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse_rows("").is_empty());
        assert!(parse_rows("\n\r\n").is_empty());
    }

    #[test]
    fn quoting_survives_reparse() {
        let fields = row(&[
            "He said \"hi\", then left",
            "line one\nline two",
            "",
            "plain",
            "\"",
        ]);
        let line = write_row(&fields);
        let parsed = parse_rows(&line);
        assert_eq!(parsed, vec![fields]);
    }

    #[test]
    fn quote_field_always_wraps() {
        assert_eq!(quote_field("plain"), "\"plain\"");
        assert_eq!(quote_field("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_field(""), "\"\"");
    }
}
