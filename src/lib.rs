// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # cve-harvest
//!
//! Harvests CVE records from a paginated, rate-limited JSON API (the NVD
//! CVE 2.0 endpoint by default) and turns them into CSV rows or into a
//! schema describing where each field lives in a record.
//!
//! ## Features
//!
//! - **Path Projection**: Schema files map CSV headers to record paths
//! - **Schema Discovery**: Headers synthesized from the richest record seen
//! - **Resilient Harvesting**: Rate-limit cooldown, bounded retry, cancellation
//! - **Window Routing**: Year-month windows drained in chronological order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cve_harvest::config::SourceConfig;
//! use cve_harvest::gather::Gatherer;
//! use cve_harvest::harvest::TracingStatus;
//! use cve_harvest::http::HttpPageSource;
//! use cve_harvest::output::CsvWriter;
//! use cve_harvest::schema::load_schema;
//! use cve_harvest::window::WindowRouter;
//!
//! #[tokio::main]
//! async fn main() -> cve_harvest::Result<()> {
//!     let source_config = SourceConfig::default();
//!     let source = HttpPageSource::new(source_config.http_config())?;
//!     let schema = load_schema("headers.txt")?;
//!     let mut writer = CsvWriter::create("cves.csv")?;
//!
//!     Gatherer::new(&source, source_config.harvester_config())
//!         .project(&WindowRouter::new(2021, 2021)?, &schema, &mut writer, &mut TracingStatus)
//!         .await?;
//!     writer.close()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Gatherer                              │
//! │   project(schema) → CSV rows     discover() → schema file    │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌───────────┬─────────────────┴──┬───────────────┬─────────────┐
//! │  Window   │     Harvester      │    Schema     │   Output    │
//! ├───────────┼────────────────────┼───────────────┼─────────────┤
//! │ Year/Month│ Offset pagination  │ Traversal     │ RowEncoder  │
//! │ Bounds    │ 403 cooldown       │ Synthesis     │ RowCounter  │
//! │           │ Bounded retry      │ Text / JSON   │ CsvWriter   │
//! └───────────┴────────────────────┴───────────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Record paths and value extraction
pub mod path;

/// Traversal, synthesis and schema files
pub mod schema;

/// CSV row encoding and output sinks
pub mod output;

/// Year-month harvest windows
pub mod window;

/// Offset pagination
pub mod pagination;

/// HTTP page source with rate limiting
pub mod http;

/// Paginated harvester state machine
pub mod harvest;

/// Project and discover orchestration
pub mod gather;

/// Source and harvester configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
