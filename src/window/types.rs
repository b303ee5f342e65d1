//! Harvest window types

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Format used for window bounds in query parameters
pub const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One year-month query unit against the remote source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HarvestWindow {
    /// Calendar year
    pub year: i32,
    /// Month, 1 through 12
    pub month: u32,
}

impl HarvestWindow {
    /// Create a window, validating the month
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid_argument(
                "month",
                format!("{month} is not between 1 and 12"),
            ));
        }
        first_day(year, month)?;
        Ok(Self { year, month })
    }

    /// First instant of the window, `YYYY-MM-01T00:00:00`
    pub fn start_bound(&self) -> String {
        self.first_day()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.format(BOUND_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Last second of the window, `YYYY-MM-<last day>T23:59:59`
    pub fn end_bound(&self) -> String {
        self.last_day()
            .and_hms_opt(23, 59, 59)
            .map(|dt| dt.format(BOUND_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Number of days in the window's month
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// The window that follows this one
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    fn first_day(&self) -> NaiveDate {
        // Construction validated the date
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    fn last_day(&self) -> NaiveDate {
        let next = self.next();
        NaiveDate::from_ymd_opt(next.year, next.month, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or_default()
    }
}

impl fmt::Display for HarvestWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

fn first_day(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::invalid_argument("year", format!("{year} is out of range")))
}
