//! Pagination module
//!
//! # Overview
//!
//! Each harvest window is drained with offset pagination: requests are
//! issued at offsets `0, S, 2S, ...` for page size `S` until the offset
//! reaches the total the source reports.

mod offset;
mod types;

pub use offset::OffsetPaginator;
pub use types::{expected_pages, NextPage, PaginationState};
