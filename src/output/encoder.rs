//! CSV row encoding
//!
//! Cells are classified after stringification: integer-like and real-like
//! text is written bare (with a trailing `.0` dropped), everything else is
//! trimmed, stripped of double quotes, escaped and wrapped in quotes.

use crate::path::{extract, value_text, FieldPath};
use crate::schema::Schema;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+$").expect("valid regex"));

static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(\d+\.\d*|\.\d+)$").expect("valid regex"));

/// Running row number shared by every row of one output file
///
/// Starts at 1; 0 accounts for the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounter {
    next: u64,
}

impl Default for RowCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RowCounter {
    /// Create a counter starting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a counter starting at an arbitrary value
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// The value the next counter cell will receive
    pub fn current(&self) -> u64 {
        self.next
    }

    /// Take the current value and advance
    pub fn advance(&mut self) -> u64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

/// One cell's input to the encoder
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    /// A value found in the record
    Value(&'a Value),
    /// The path did not resolve
    Absent,
    /// Row-counter column
    Counter,
}

/// Check whether text is integer-like or real-like
pub fn is_numeric_text(text: &str) -> bool {
    INTEGER.is_match(text) || DECIMAL.is_match(text)
}

/// Drop a trailing `.0` from numeric text
pub fn normalize_number(text: &str) -> &str {
    text.strip_suffix(".0").unwrap_or(text)
}

/// Quote and escape free text
pub fn quote_text(text: &str) -> String {
    let cleaned = text
        .trim()
        .replace("\\\"", "'")
        .replace('"', "'")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{cleaned}\"")
}

/// Encode one found value as cell text
///
/// JSON `null` renders as an empty cell.
pub fn encode_value(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }

    let text = value_text(value);
    if is_numeric_text(&text) {
        normalize_number(&text).to_string()
    } else {
        quote_text(&text)
    }
}

/// Encode one cell, advancing the counter for counter cells
pub fn encode_cell(cell: Cell<'_>, counter: &mut RowCounter) -> String {
    match cell {
        Cell::Value(value) => encode_value(value),
        Cell::Absent => String::new(),
        Cell::Counter => counter.advance().to_string(),
    }
}

/// Encode a full row, newline-terminated
pub fn encode_row<'a, I>(cells: I, counter: &mut RowCounter) -> String
where
    I: IntoIterator<Item = Cell<'a>>,
{
    let encoded: Vec<String> = cells
        .into_iter()
        .map(|cell| encode_cell(cell, counter))
        .collect();
    let mut row = encoded.join(",");
    row.push('\n');
    row
}

/// Projects records through a schema into CSV lines
#[derive(Debug, Clone, Copy)]
pub struct RowEncoder<'s> {
    schema: &'s Schema,
}

impl<'s> RowEncoder<'s> {
    /// Create an encoder for a schema
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    /// Headers joined with `,`, newline-terminated
    pub fn header_line(&self) -> String {
        let mut line = self.schema.headers().join(",");
        line.push('\n');
        line
    }

    /// Project one record into an encoded row
    pub fn encode(&self, record: &Value, counter: &mut RowCounter) -> String {
        let cells = self.schema.iter().map(|field| match &field.path {
            FieldPath::NullPath => Cell::Counter,
            FieldPath::Path(path) => extract(record, path).map_or(Cell::Absent, Cell::Value),
        });
        encode_row(cells, counter)
    }
}
