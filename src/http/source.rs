//! Page source abstraction
//!
//! The harvester talks to the remote source only through `PageSource`,
//! which lets tests substitute a scripted in-memory source.

use super::types::RawResponse;
use crate::error::Result;
use crate::pagination::OffsetPaginator;
use crate::window::HarvestWindow;
use async_trait::async_trait;

/// A paginated, failure-prone source of records
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Issue one request for the window at the given offset
    ///
    /// Any status is returned as a response; only transport failures are
    /// errors.
    async fn fetch(&self, window: &HarvestWindow, offset: u64) -> Result<RawResponse>;

    /// Paginator describing the source's page size
    fn paginator(&self) -> &OffsetPaginator;
}
