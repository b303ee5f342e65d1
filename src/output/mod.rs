//! Output module
//!
//! Handles CSV row encoding and line-oriented output sinks.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Encoding extracted values as CSV-safe cells
//! - Filling counter columns from a per-file `RowCounter`
//! - Writing lines to files or in-memory sinks

mod encoder;
mod writer;

pub use encoder::{
    encode_cell, encode_row, encode_value, is_numeric_text, normalize_number, quote_text, Cell,
    RowCounter, RowEncoder,
};
pub use writer::{CsvWriter, LineSink};
