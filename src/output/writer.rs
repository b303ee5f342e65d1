//! Line-oriented output sinks
//!
//! Provides the sink abstraction the orchestrator writes through and the
//! buffered file writer used by the binary.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A destination accepting one line of text at a time
pub trait LineSink {
    /// Write a line; the text carries its own terminator
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Buffered writer over any `io::Write`
pub struct CsvWriter<W: Write> {
    /// Underlying buffered writer
    writer: BufWriter<W>,
    /// Number of lines written
    lines_written: usize,
}

impl CsvWriter<File> {
    /// Create (or truncate) the output file
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            Error::output(format!(
                "Failed to create output file '{}': {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(file))
    }
}

impl<W: Write> CsvWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            lines_written: 0,
        }
    }

    /// Get the number of lines written so far
    #[must_use]
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush and return the inner writer with the line count
    pub fn close(self) -> Result<(W, usize)> {
        let lines = self.lines_written;
        let inner = self
            .writer
            .into_inner()
            .map_err(|e| Error::output(format!("Failed to flush output: {}", e.error())))?;
        Ok((inner, lines))
    }
}

impl<W: Write> LineSink for CsvWriter<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .map_err(|e| Error::output(format!("Failed to write line: {e}")))?;
        self.lines_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::output(format!("Failed to flush output: {e}")))
    }
}
