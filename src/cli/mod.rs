//! CLI module
//!
//! Command-line interface for harvesting.
//!
//! # Commands
//!
//! - `gather` - Write one CSV row per record using a schema file
//! - `discover` - Synthesize a schema file from the harvested records
//! - `validate` - Check a schema file without touching the network

mod commands;
mod runner;

pub use commands::{Cli, Commands, DiscoverFormat, HarvestArgs};
pub use runner::{build_router, Runner};
