//! HTTP page source module
//!
//! Provides the page source the harvester fetches through.
//!
//! # Features
//!
//! - **Page Source Trait**: `PageSource` seam between harvester and transport
//! - **Rate Limiting**: Token bucket throttle using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff

mod client;
mod rate_limit;
mod source;
mod types;

pub use client::{calculate_backoff, HttpPageSource, HttpSourceConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use source::PageSource;
pub use types::{ExtraArg, RawResponse};

#[cfg(test)]
mod tests;
