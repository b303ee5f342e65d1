//! CLI commands and argument parsing

use crate::http::ExtraArg;
use crate::schema::DEFAULT_MAX_HEADER_PARTS;
use crate::types::SchemaFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Harvest CVE records from the NVD API into CSV files
#[derive(Parser, Debug)]
#[command(name = "cve-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source description file (YAML)
    #[arg(long, global = true)]
    pub source_config: Option<PathBuf>,

    /// API key sent with every request
    #[arg(long, global = true, env = "api_key", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one CSV row per record using a schema file
    Gather {
        #[command(flatten)]
        harvest: HarvestArgs,

        /// Schema file mapping CSV headers to record paths
        #[arg(short = 'c', long)]
        schema: PathBuf,
    },

    /// Synthesize a schema file from the richest record
    Discover {
        #[command(flatten)]
        harvest: HarvestArgs,

        /// Schema encoding
        #[arg(short, long, default_value = "txt")]
        format: DiscoverFormat,

        /// Path segments joined into each header
        #[arg(long, default_value_t = DEFAULT_MAX_HEADER_PARTS)]
        max_header_parts: usize,

        /// Maximum number of fields written (0 = unlimited)
        #[arg(long, default_value = "0")]
        limit: usize,
    },

    /// Validate a schema file and list its fields
    Validate {
        /// Schema file to check
        #[arg(short = 'c', long)]
        schema: PathBuf,
    },
}

/// Arguments shared by the harvesting commands
#[derive(Args, Debug, Clone)]
pub struct HarvestArgs {
    /// Where the output is written
    #[arg(short, long)]
    pub output: PathBuf,

    /// First published year (inclusive)
    #[arg(short, long)]
    pub start_year: i32,

    /// Last published year (inclusive)
    #[arg(short, long)]
    pub end_year: i32,

    /// Extra query argument, `key=value` or a bare flag (repeatable)
    #[arg(long = "extra-arg", value_parser = parse_extra_arg)]
    pub extra_args: Vec<ExtraArg>,
}

fn parse_extra_arg(value: &str) -> crate::error::Result<ExtraArg> {
    value.parse()
}

/// Discover output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DiscoverFormat {
    /// `HEADER:SEG,...` lines
    Txt,
    /// A JSON object of segment arrays
    Json,
}

impl From<DiscoverFormat> for SchemaFormat {
    fn from(format: DiscoverFormat) -> Self {
        match format {
            DiscoverFormat::Txt => SchemaFormat::Text,
            DiscoverFormat::Json => SchemaFormat::Structured,
        }
    }
}
