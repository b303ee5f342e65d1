//! Harvest module
//!
//! Fetches every page of every window from a `PageSource`, recovering from
//! rate limiting and bounded transient failure on the way.
//!
//! # Overview
//!
//! - `Harvester`: the per-window request state machine
//! - `PageHandler`: receives pages as they arrive
//! - `StatusSink`: receives human-readable progress messages
//! - `Shutdown`: cancels any wait point

mod harvester;
mod shutdown;
mod status;
mod types;

pub use harvester::{Harvester, PageHandler};
pub use shutdown::{shutdown_channel, Shutdown, ShutdownTrigger};
pub use status::{StatusSink, TracingStatus};
pub use types::{FetchOutcome, HarvestStats, Page};
