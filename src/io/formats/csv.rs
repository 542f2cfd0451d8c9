//! CSV codec for the menu interchange format.
//!
//! Parsing is a character-level state machine run once per physical line.
//! Every non-blank line is exactly one row, and a failure stays local to the
//! line it occurred on, so one bad row never aborts the batch.
//!
//! Serialization quotes a field only when it contains the delimiter, a quote
//! or a line break, doubling embedded quotes.

use std::fmt;

use super::{HEADER, MAX_TEXT_BYTES};
use crate::{Error, Result};

/// Longest physical line accepted, in characters.
pub const MAX_LINE_CHARS: usize = 50_000;

/// Extra characters a row may scan beyond [`MAX_LINE_CHARS`] before it is
/// abandoned as a parse timeout.
pub const SCAN_SLACK: usize = 1_000;

const DELIMITER: char = ',';
const QUOTE: char = '"';
const BOM: char = '\u{feff}';

/// Why a single row could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A quoted field was still open at the end of the row.
    UnterminatedQuote,
    /// Text followed a closing quote inside the same field.
    MalformedQuote {
        /// 1-based field position.
        field: usize,
    },
    /// The physical line exceeds [`MAX_LINE_CHARS`].
    LineTooLong {
        /// Characters on the line.
        chars: usize,
    },
    /// The row scanned more characters than its budget allows.
    ParseTimeout,
    /// The row has fewer fields than a record needs.
    InsufficientFields {
        /// Fields found.
        found: usize,
        /// Fields required.
        required: usize,
    },
    /// A standalone field value decoded to more than one field.
    NotASingleField {
        /// Fields found.
        found: usize,
    },
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedQuote => f.write_str("unterminated quote"),
            Self::MalformedQuote { field } => {
                write!(f, "unexpected text after closing quote in field {field}")
            },
            Self::LineTooLong { chars } => {
                write!(f, "line too long ({chars} characters, limit {MAX_LINE_CHARS})")
            },
            Self::ParseTimeout => f.write_str("parse timeout"),
            Self::InsufficientFields { found, required } => {
                write!(f, "insufficient fields (found {found}, need at least {required})")
            },
            Self::NotASingleField { found } => {
                write!(f, "expected a single field, found {found}")
            },
        }
    }
}

/// A row that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based line number in the normalized text.
    pub line: usize,
    /// What went wrong.
    pub error: RowError,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// A successfully parsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    /// 1-based line number in the normalized text.
    pub line: usize,
    /// Field values, unquoted and unescaped.
    pub fields: Vec<String>,
}

/// Result of parsing a whole document.
#[derive(Debug, Clone, Default)]
pub struct CsvDocument {
    /// The header fields as read.
    pub header: Vec<String>,
    /// Data rows in input order.
    pub rows: Vec<ParsedRow>,
    /// Rows that were dropped, in input order.
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteClosed,
}

/// Incremental scanner for one logical row.
#[derive(Debug)]
struct RowScanner {
    fields: Vec<String>,
    field: String,
    state: State,
    steps: usize,
    budget: usize,
}

impl RowScanner {
    const fn new(budget: usize) -> Self {
        Self {
            fields: Vec::new(),
            field: String::new(),
            state: State::FieldStart,
            steps: 0,
            budget,
        }
    }

    const fn is_quoted(&self) -> bool {
        matches!(self.state, State::Quoted)
    }

    fn end_field(&mut self) {
        self.fields.push(std::mem::take(&mut self.field));
        self.state = State::FieldStart;
    }

    /// Scans one physical segment of the row.
    fn feed(&mut self, segment: &str) -> std::result::Result<(), RowError> {
        let mut chars = segment.chars().peekable();
        while let Some(c) = chars.next() {
            self.steps += 1;
            if self.steps > self.budget {
                return Err(RowError::ParseTimeout);
            }

            match self.state {
                State::FieldStart => match c {
                    QUOTE => self.state = State::Quoted,
                    DELIMITER => self.end_field(),
                    _ => {
                        self.field.push(c);
                        self.state = State::Unquoted;
                    },
                },
                State::Unquoted => match c {
                    DELIMITER => self.end_field(),
                    _ => self.field.push(c),
                },
                State::Quoted => {
                    if c == QUOTE {
                        if chars.peek() == Some(&QUOTE) {
                            chars.next();
                            self.steps += 1;
                            self.field.push(QUOTE);
                        } else {
                            self.state = State::QuoteClosed;
                        }
                    } else {
                        self.field.push(c);
                    }
                },
                State::QuoteClosed => match c {
                    DELIMITER => self.end_field(),
                    _ => {
                        return Err(RowError::MalformedQuote {
                            field: self.fields.len() + 1,
                        });
                    },
                },
            }
        }
        Ok(())
    }

    /// Completes the row.
    fn finish(mut self) -> std::result::Result<Vec<String>, RowError> {
        if self.is_quoted() {
            return Err(RowError::UnterminatedQuote);
        }
        self.fields.push(self.field);
        Ok(self.fields)
    }
}

/// Parses one physical line as a complete row.
///
/// A quoted field still open at the end of the line fails the row; rows
/// never continue onto the next line.
fn parse_line(line: &str) -> std::result::Result<Vec<String>, RowError> {
    let chars = line.chars().count();
    if chars > MAX_LINE_CHARS {
        return Err(RowError::LineTooLong { chars });
    }
    let mut scanner = RowScanner::new(MAX_LINE_CHARS + SCAN_SLACK);
    scanner.feed(line)?;
    scanner.finish()
}

/// Normalizes line endings to `\n` and drops a leading byte-order mark.
#[must_use]
pub fn normalize_line_endings(text: &str) -> String {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parses a single logical row.
///
/// Line breaks are ordinary characters here; inside quotes they are part of
/// the field value.
///
/// # Errors
///
/// Returns the [`RowError`] that made the row unparsable.
pub fn parse_record(row: &str) -> std::result::Result<Vec<String>, RowError> {
    let mut scanner = RowScanner::new(row.chars().count() + SCAN_SLACK);
    scanner.feed(row)?;
    scanner.finish()
}

/// Decodes one serialized field value.
///
/// # Errors
///
/// Returns a [`RowError`] if the value is malformed or holds more than one field.
pub fn parse_field(value: &str) -> std::result::Result<String, RowError> {
    let mut fields = parse_record(value)?;
    if fields.len() != 1 {
        return Err(RowError::NotASingleField {
            found: fields.len(),
        });
    }
    Ok(fields.pop().unwrap_or_default())
}

/// Parses interchange text into rows.
///
/// The text is normalized first and blank lines are dropped. Every remaining
/// line is one row, and a quote left open at the end of a line fails that
/// row alone. The first row is handed to `check_header`; if it rejects the header nothing else is
/// parsed. Each later row either lands in [`CsvDocument::rows`] or is
/// recorded in [`CsvDocument::failures`].
///
/// # Errors
///
/// Returns [`Error::TextTooLarge`] if the normalized text exceeds
/// [`MAX_TEXT_BYTES`], [`Error::HeaderMismatch`] if the header row is absent
/// or unparsable, or whatever `check_header` returns.
pub fn parse<F>(text: &str, check_header: F) -> Result<CsvDocument>
where
    F: FnOnce(&[String]) -> Result<()>,
{
    let normalized = normalize_line_endings(text);
    if normalized.len() > MAX_TEXT_BYTES {
        return Err(Error::TextTooLarge {
            size: normalized.len(),
            limit: MAX_TEXT_BYTES,
        });
    }

    let lines: Vec<(usize, &str)> = normalized
        .split('\n')
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| (i + 1, line))
        .collect();

    let Some((&(_, header_text), data)) = lines.split_first() else {
        return Err(header_mismatch(""));
    };

    let header = parse_line(header_text).map_err(|_| header_mismatch(header_text))?;
    check_header(&header)?;

    let mut document = CsvDocument {
        header,
        ..CsvDocument::default()
    };

    for &(line, text) in data {
        match parse_line(text) {
            Ok(fields) => {
                tracing::trace!(line, fields = fields.len(), "parsed row");
                document.rows.push(ParsedRow { line, fields });
            },
            Err(error) => {
                tracing::debug!(line, %error, "dropped malformed row");
                document.failures.push(RowFailure { line, error });
            },
        }
    }

    Ok(document)
}

fn header_mismatch(found: &str) -> Error {
    Error::HeaderMismatch {
        expected: super::header_line(),
        found: found.to_string(),
    }
}

/// Returns whether a field must be quoted.
#[must_use]
pub fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\n', '\r'])
}

/// Encodes one field value.
#[must_use]
pub fn serialize_field(field: &str) -> String {
    if needs_quoting(field) {
        format!("{QUOTE}{}{QUOTE}", field.replace(QUOTE, "\"\""))
    } else {
        field.to_string()
    }
}

/// Serializes rows under the interchange header.
///
/// The header is always the first row. Rows are joined with `\n` and the
/// text has no trailing line terminator.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the CSV writer fails.
pub fn serialize<I, R, F>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(::csv::QuoteStyle::Necessary)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER).map_err(write_error)?;
    for row in rows {
        writer.write_record(row).map_err(write_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::OperationFailed {
        operation: "flush_csv".to_string(),
        cause: e.to_string(),
    })?;
    let mut text = String::from_utf8(bytes).map_err(|e| Error::OperationFailed {
        operation: "encode_csv".to_string(),
        cause: e.to_string(),
    })?;

    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

#[allow(clippy::needless_pass_by_value)]
fn write_error(e: ::csv::Error) -> Error {
    Error::OperationFailed {
        operation: "write_csv".to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn accept_any(_: &[String]) -> Result<()> {
        Ok(())
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test_case("a,b,c,d", &["a", "b", "c", "d"] ; "simple")]
    #[test_case("a,\"b,c\",d", &["a", "b,c", "d"] ; "quoted delimiter")]
    #[test_case("a,\"b\"\"c\",d", &["a", "b\"c", "d"] ; "doubled quote")]
    #[test_case("a,,c,", &["a", "", "c", ""] ; "empty fields")]
    #[test_case("a,\"b\nc\",d", &["a", "b\nc", "d"] ; "line break in quotes")]
    #[test_case("\"a,b\",\"c\"\"d\"\"\",\"e,f\"", &["a,b", "c\"d\"", "e,f"] ; "complex quoting")]
    #[test_case("a,b\"c,d", &["a", "b\"c", "d"] ; "quote inside unquoted field")]
    #[test_case("", &[""] ; "empty row")]
    fn test_parse_record(input: &str, expected: &[&str]) {
        assert_eq!(parse_record(input).unwrap(), strings(expected));
    }

    #[test]
    fn test_parse_record_unterminated() {
        assert_eq!(parse_record("a,\"bc"), Err(RowError::UnterminatedQuote));
    }

    #[test]
    fn test_parse_record_text_after_closing_quote() {
        assert_eq!(
            parse_record("a,\"b\"c,d"),
            Err(RowError::MalformedQuote { field: 2 })
        );
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_line_endings("\u{feff}folder"), "folder");
    }

    #[test]
    fn test_parse_document_rows_and_lines() {
        let text = "folder,title,prompt,context\n\nA,T1,P1,both\r\nB,T2,P2,page\rC,T3,P3,selection\n";
        let doc = parse(text, accept_any).unwrap();
        assert_eq!(doc.header, strings(&HEADER));
        assert_eq!(doc.rows.len(), 3);
        assert_eq!(doc.rows[0].line, 3);
        assert_eq!(doc.rows[2].fields, strings(&["C", "T3", "P3", "selection"]));
        assert!(doc.failures.is_empty());
    }

    #[test]
    fn test_header_rejection_stops_parsing() {
        let text = "a,b,c\nA,T1,P1,both";
        let err = parse(text, |_| {
            Err(Error::HeaderMismatch {
                expected: "x".to_string(),
                found: "y".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, Error::HeaderMismatch { .. }));
    }

    #[test]
    fn test_blank_text_is_header_mismatch() {
        let err = parse("\n  \n", accept_any).unwrap_err();
        assert!(matches!(err, Error::HeaderMismatch { found, .. } if found.is_empty()));
    }

    #[test]
    fn test_quoted_line_break_is_not_continued() {
        let text = "folder,title,prompt,context\nA,T,\"line one\n\nline two\",both\nB,T2,P2,page";
        let doc = parse(text, accept_any).unwrap();
        // The tail of the broken field is a short row of its own.
        assert_eq!(doc.rows.len(), 2);
        assert_eq!(doc.rows[0].line, 4);
        assert_eq!(doc.rows[0].fields, strings(&["line two\"", "both"]));
        assert_eq!(doc.rows[1].line, 5);
        assert_eq!(
            doc.failures,
            vec![RowFailure {
                line: 2,
                error: RowError::UnterminatedQuote
            }]
        );
    }

    #[test]
    fn test_unterminated_quote_does_not_swallow_later_rows() {
        let text = "folder,title,prompt,context\n\
                    A,T1,P1,both\n\
                    B,\"T2,P2,both\n\
                    C,T3,P3,both\n\
                    D,T4,\",starts with comma\",both";
        let doc = parse(text, accept_any).unwrap();
        assert_eq!(doc.rows.len(), 3);
        assert_eq!(doc.rows[2].fields, strings(&["D", "T4", ",starts with comma", "both"]));
        assert_eq!(
            doc.failures,
            vec![RowFailure {
                line: 3,
                error: RowError::UnterminatedQuote
            }]
        );
    }

    #[test_case(0 ; "first row")]
    #[test_case(2 ; "middle row")]
    #[test_case(4 ; "last row")]
    fn test_unterminated_quote_among_quoted_rows(bad: usize) {
        let mut rows: Vec<String> = (0..5)
            .map(|i| format!("F{i},\"T,{i}\",\"say \"\"{i}\"\"\",both"))
            .collect();
        rows[bad] = format!("F{bad},\"T{bad},P,both");
        let text = format!("folder,title,prompt,context\n{}", rows.join("\n"));

        let doc = parse(&text, accept_any).unwrap();
        assert_eq!(doc.rows.len(), 4);
        assert_eq!(doc.failures.len(), 1);
        assert_eq!(doc.failures[0].line, bad + 2);
        assert!(doc.rows.iter().all(|row| row.fields.len() == 4));
    }

    #[test]
    fn test_unterminated_quote_is_isolated() {
        let text = "folder,title,prompt,context\n\
                    A,T1,P1,both\n\
                    B,\"T2,P2,both\n\
                    C,T3,P3,both\n\
                    D,T4,P4,both";
        let doc = parse(text, accept_any).unwrap();
        assert_eq!(doc.rows.len(), 3);
        assert_eq!(
            doc.failures,
            vec![RowFailure {
                line: 3,
                error: RowError::UnterminatedQuote
            }]
        );
    }

    #[test]
    fn test_unterminated_quote_before_quoted_rows() {
        let text = "folder,title,prompt,context\n\
                    B,\"T2,P2,both\n\
                    C,T3,\"P,3\",both";
        let doc = parse(text, accept_any).unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].fields[2], "P,3");
        assert_eq!(doc.failures[0].line, 2);
    }

    #[test]
    fn test_long_line_fails_row() {
        let long = "x".repeat(MAX_LINE_CHARS + 1);
        let text = format!("folder,title,prompt,context\nA,{long},P,both\nB,T,P,both");
        let doc = parse(&text, accept_any).unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert!(matches!(
            doc.failures[0].error,
            RowError::LineTooLong { chars } if chars > MAX_LINE_CHARS
        ));
    }

    #[test]
    fn test_scan_budget_times_out() {
        let mut scanner = RowScanner::new(8);
        assert_eq!(scanner.feed("a,b,c,d,e,f"), Err(RowError::ParseTimeout));
    }

    #[test]
    fn test_text_too_large() {
        let text = "x".repeat(MAX_TEXT_BYTES + 1);
        let err = parse(&text, accept_any).unwrap_err();
        assert!(matches!(err, Error::TextTooLarge { .. }));
    }

    #[test_case("plain", "plain" ; "no quoting")]
    #[test_case("a,b", "\"a,b\"" ; "delimiter")]
    #[test_case("say \"hi\"", "\"say \"\"hi\"\"\"" ; "quotes")]
    #[test_case("a\nb", "\"a\nb\"" ; "newline")]
    #[test_case("a\rb", "\"a\rb\"" ; "carriage return")]
    #[test_case("", "" ; "empty")]
    fn test_serialize_field(input: &str, expected: &str) {
        assert_eq!(serialize_field(input), expected);
        assert_eq!(parse_field(&serialize_field(input)).unwrap(), input);
    }

    #[test]
    fn test_serialize_header_first_no_trailing_newline() {
        let text = serialize([["A", "T", "P", "both"]]).unwrap();
        assert_eq!(text, "folder,title,prompt,context\nA,T,P,both");

        let empty: Vec<[&str; 4]> = Vec::new();
        assert_eq!(serialize(empty).unwrap(), "folder,title,prompt,context");
    }

    #[test]
    fn test_serialize_matches_field_escaping() {
        let row = ["A/B", "x,y", "he said \"go\"\nthen left", "page"];
        let text = serialize([row]).unwrap();
        let expected_row: Vec<String> = row.iter().map(|f| serialize_field(f)).collect();
        assert_eq!(
            text,
            format!("folder,title,prompt,context\n{}", expected_row.join(","))
        );

        let (_, data) = text.split_once('\n').unwrap();
        assert_eq!(parse_record(data).unwrap(), strings(&row));
    }

    #[test]
    fn test_parse_field_rejects_multiple() {
        assert_eq!(
            parse_field("a,b"),
            Err(RowError::NotASingleField { found: 2 })
        );
    }
}
