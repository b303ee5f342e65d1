//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, DiscoverFormat, HarvestArgs};
use crate::config::{SourceConfig, ThrottleConfig};
use crate::error::Result;
use crate::gather::{DiscoverOptions, Gatherer};
use crate::harvest::{Shutdown, TracingStatus};
use crate::http::HttpPageSource;
use crate::output::CsvWriter;
use crate::schema::{load_schema, SynthesisOptions};
use crate::types::OptionStringExt;
use crate::window::{validate_year, WindowRouter};
use chrono::{Datelike, Utc};
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
    shutdown: Shutdown,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            shutdown: Shutdown::never(),
        }
    }

    /// Cancel waits when `shutdown` fires
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Gather { harvest, schema } => self.gather(harvest, schema).await,
            Commands::Discover {
                harvest,
                format,
                max_header_parts,
                limit,
            } => {
                self.discover(harvest, *format, *max_header_parts, *limit)
                    .await
            }
            Commands::Validate { schema } => self.validate(schema),
        }
    }

    /// Load the source description, or the defaults
    fn source_config(&self) -> Result<SourceConfig> {
        match &self.cli.source_config {
            Some(path) => SourceConfig::from_file(path),
            None => Ok(SourceConfig::default()),
        }
    }

    /// API key from the flag or the `api_key` environment variable
    fn api_key(&self) -> Option<String> {
        self.cli.api_key.clone().none_if_empty()
    }

    /// Build the page source for a harvest
    fn page_source(&self, source: &SourceConfig, args: &HarvestArgs) -> Result<HttpPageSource> {
        let api_key = self.api_key();
        let throttle = source
            .throttle
            .unwrap_or_else(|| ThrottleConfig::published(api_key.is_some()));
        debug!(
            has_api_key = api_key.is_some(),
            requests = throttle.requests,
            per_seconds = throttle.per_seconds,
            "Building page source"
        );

        HttpPageSource::new(
            source
                .http_config()
                .with_api_key(api_key)
                .with_extra_args(args.extra_args.clone())
                .with_throttle(Some(throttle.limiter_config())),
        )
    }

    /// Gather rows through a schema file
    async fn gather(&self, args: &HarvestArgs, schema_path: &Path) -> Result<()> {
        let schema = load_schema(schema_path)?;
        let router = build_router(args.start_year, args.end_year)?;
        let source_config = self.source_config()?;
        let source = self.page_source(&source_config, args)?;

        let mut writer = CsvWriter::create(&args.output)?;
        let stats = Gatherer::new(&source, source_config.harvester_config())
            .with_shutdown(self.shutdown.clone())
            .project(&router, &schema, &mut writer, &mut TracingStatus)
            .await?;
        let (_, lines) = writer.close()?;

        info!(
            output = %args.output.display(),
            lines,
            records = stats.harvest.records,
            duration_ms = stats.duration_ms,
            "Wrote CSV output"
        );
        Ok(())
    }

    /// Discover a schema from the richest record
    async fn discover(
        &self,
        args: &HarvestArgs,
        format: DiscoverFormat,
        max_header_parts: usize,
        limit: usize,
    ) -> Result<()> {
        let router = build_router(args.start_year, args.end_year)?;
        let source_config = self.source_config()?;
        let source = self.page_source(&source_config, args)?;
        let options = DiscoverOptions::new()
            .with_format(format.into())
            .with_synthesis(
                SynthesisOptions::new()
                    .with_max_header_parts(max_header_parts)
                    .with_limit(limit),
            );

        let mut writer = CsvWriter::create(&args.output)?;
        let (schema, stats) = Gatherer::new(&source, source_config.harvester_config())
            .with_shutdown(self.shutdown.clone())
            .discover(&router, &options, &mut writer, &mut TracingStatus)
            .await?;
        writer.close()?;

        info!(
            output = %args.output.display(),
            fields = schema.len(),
            sample_leaves = stats.sample_leaves.unwrap_or(0),
            "Wrote schema"
        );
        Ok(())
    }

    /// Validate a schema file and print its fields
    fn validate(&self, schema_path: &Path) -> Result<()> {
        let schema = load_schema(schema_path)?;

        println!(
            "Schema '{}' is valid with {} fields",
            schema_path.display(),
            schema.len()
        );
        for field in &schema {
            println!("{}", field.to_text_line());
        }
        Ok(())
    }
}

/// Validate the year range against the published range and build a router
pub fn build_router(start_year: i32, end_year: i32) -> Result<WindowRouter> {
    let current_year = Utc::now().year();
    validate_year(start_year, current_year)?;
    validate_year(end_year, current_year)?;
    WindowRouter::new(start_year, end_year)
}
