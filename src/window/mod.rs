//! Window routing module
//!
//! Splits a harvest into year-month windows, each queried with its own
//! start/end timestamp bounds and drained before the next one starts.

mod router;
mod types;

pub use router::{validate_year, WindowRouter, MIN_YEAR};
pub use types::{HarvestWindow, BOUND_FORMAT};

#[cfg(test)]
mod tests;
