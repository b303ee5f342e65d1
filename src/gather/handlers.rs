//! Page handlers for the two gather modes

use super::types::RichestSample;
use crate::error::Result;
use crate::harvest::{Page, PageHandler};
use crate::output::{LineSink, RowCounter, RowEncoder};
use crate::window::HarvestWindow;

/// Encodes every record of every page as one output row
pub struct ProjectHandler<'a, S> {
    encoder: RowEncoder<'a>,
    counter: RowCounter,
    sink: &'a mut S,
    rows: u64,
}

impl<'a, S: LineSink + Send> ProjectHandler<'a, S> {
    /// Create a handler writing to `sink`
    pub fn new(encoder: RowEncoder<'a>, sink: &'a mut S) -> Self {
        Self {
            encoder,
            counter: RowCounter::new(),
            sink,
            rows: 0,
        }
    }

    /// Rows written so far
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl<S: LineSink + Send> PageHandler for ProjectHandler<'_, S> {
    fn handle_page(&mut self, _window: &HarvestWindow, page: Page) -> Result<()> {
        for record in &page.records {
            let row = self.encoder.encode(record, &mut self.counter);
            self.sink.write_line(&row)?;
            self.rows += 1;
        }
        Ok(())
    }
}

/// Keeps the richest record across all pages
#[derive(Debug, Default)]
pub struct DiscoverHandler {
    sample: RichestSample,
}

impl DiscoverHandler {
    /// Create an empty handler
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample collected so far
    pub fn into_sample(self) -> RichestSample {
        self.sample
    }
}

impl PageHandler for DiscoverHandler {
    fn handle_page(&mut self, _window: &HarvestWindow, page: Page) -> Result<()> {
        for record in page.records {
            self.sample.offer(record);
        }
        Ok(())
    }
}
