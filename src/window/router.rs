//! Chronological window routing
//!
//! Produces every month from January of the start year through December
//! of the end year, inclusive.

use super::types::HarvestWindow;
use crate::error::{Error, Result};

/// Earliest year the source publishes records for
pub const MIN_YEAR: i32 = 1988;

/// Month-by-month router over an inclusive year range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRouter {
    start_year: i32,
    end_year: i32,
}

impl WindowRouter {
    /// Create a router, requiring `start_year <= end_year`
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        if start_year > end_year {
            return Err(Error::invalid_argument(
                "start_year",
                format!("start year {start_year} is after end year {end_year}"),
            ));
        }
        // Both ends must be representable dates
        HarvestWindow::new(start_year, 1)?;
        HarvestWindow::new(end_year, 12)?;

        Ok(Self {
            start_year,
            end_year,
        })
    }

    /// First year of the range
    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    /// Last year of the range
    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Total number of windows
    pub fn len(&self) -> usize {
        ((self.end_year - self.start_year + 1) * 12) as usize
    }

    /// Always false: a valid range covers at least one year
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Windows in chronological order
    pub fn windows(&self) -> impl Iterator<Item = HarvestWindow> + '_ {
        (self.start_year..=self.end_year)
            .flat_map(|year| (1..=12).map(move |month| HarvestWindow { year, month }))
    }
}

/// Validate a year against the published range `MIN_YEAR..=max_year`
pub fn validate_year(year: i32, max_year: i32) -> Result<i32> {
    if year < MIN_YEAR || year > max_year {
        return Err(Error::invalid_argument(
            "year",
            format!("{year} is outside {MIN_YEAR} - {max_year} (inclusive)"),
        ));
    }
    Ok(year)
}
