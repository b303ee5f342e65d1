//! Gather orchestrator module
//!
//! Runs a harvest and turns its records into output.
//!
//! # Overview
//!
//! - **Project mode**: writes the schema's header row, then one encoded row
//!   per record, numbering counter columns with a single `RowCounter`
//! - **Discover mode**: keeps the richest record of the whole run and writes
//!   a schema synthesized from it

mod handlers;
mod types;

pub use handlers::{DiscoverHandler, ProjectHandler};
pub use types::{DiscoverOptions, GatherStats, RichestSample};

use crate::config::HarvesterConfig;
use crate::error::Result;
use crate::harvest::{Harvester, Shutdown, StatusSink};
use crate::http::PageSource;
use crate::output::{LineSink, RowEncoder};
use crate::schema::{synthesize, traverse, Schema};
use crate::types::SchemaFormat;
use crate::window::WindowRouter;
use std::time::Instant;
use tracing::{info, warn};

/// Orchestrates one gather run over a page source
pub struct Gatherer<'a> {
    source: &'a dyn PageSource,
    config: HarvesterConfig,
    shutdown: Shutdown,
}

impl<'a> Gatherer<'a> {
    /// Create a gatherer
    pub fn new(source: &'a dyn PageSource, config: HarvesterConfig) -> Self {
        Self {
            source,
            config,
            shutdown: Shutdown::never(),
        }
    }

    /// Cancel waits when `shutdown` fires
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    fn harvester<'s>(&'s self, status: &'s mut dyn StatusSink) -> Harvester<'s> {
        Harvester::new(self.source, self.config.clone(), status)
            .with_shutdown(self.shutdown.clone())
    }

    /// Project mode: one row per record through `schema`
    pub async fn project<S: LineSink + Send>(
        &self,
        router: &WindowRouter,
        schema: &Schema,
        sink: &mut S,
        status: &mut dyn StatusSink,
    ) -> Result<GatherStats> {
        let start = Instant::now();
        let encoder = RowEncoder::new(schema);
        sink.write_line(&encoder.header_line())?;

        let mut handler = ProjectHandler::new(encoder, sink);
        let harvest = self.harvester(status).run(router, &mut handler).await?;
        let rows = handler.rows();
        sink.flush()?;

        info!(
            windows = harvest.windows,
            pages = harvest.pages,
            rows,
            "Gather complete"
        );

        Ok(GatherStats {
            harvest,
            lines_written: rows + 1,
            sample_leaves: None,
            duration_ms: elapsed_ms(start),
        })
    }

    /// Discover mode: synthesize and write a schema from the richest record
    pub async fn discover<S: LineSink + Send>(
        &self,
        router: &WindowRouter,
        options: &DiscoverOptions,
        sink: &mut S,
        status: &mut dyn StatusSink,
    ) -> Result<(Schema, GatherStats)> {
        let start = Instant::now();
        let mut handler = DiscoverHandler::new();
        let harvest = self.harvester(status).run(router, &mut handler).await?;

        let sample = handler.into_sample();
        let sample_leaves = sample.leaf_count();
        let schema = match sample.record() {
            Some(record) => synthesize(traverse(record).map(|leaf| leaf.path), options.synthesis),
            None => {
                warn!("No records harvested; writing an empty schema");
                Schema::new()
            }
        };

        let lines_written = write_schema(&schema, options.format, sink)?;
        sink.flush()?;

        info!(
            records = harvest.records,
            leaves = sample_leaves.unwrap_or(0),
            fields = schema.len(),
            "Discovery complete"
        );

        Ok((
            schema,
            GatherStats {
                harvest,
                lines_written,
                sample_leaves,
                duration_ms: elapsed_ms(start),
            },
        ))
    }
}

/// Write a schema in the chosen encoding, returning the line count
pub fn write_schema<S: LineSink + ?Sized>(
    schema: &Schema,
    format: SchemaFormat,
    sink: &mut S,
) -> Result<u64> {
    let rendered = match format {
        SchemaFormat::Text => schema.to_text(),
        SchemaFormat::Structured => schema.to_structured()?,
    };
    if rendered.is_empty() {
        return Ok(0);
    }

    let mut lines = 0;
    for line in rendered.lines() {
        sink.write_line(&format!("{line}\n"))?;
        lines += 1;
    }
    Ok(lines)
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests;
