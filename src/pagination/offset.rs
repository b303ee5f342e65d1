//! Offset pagination
//!
//! The source returns at most `page_size` records per request and reports
//! the window's total on every page. The offset advances by the page size
//! (not by the number of records received) until it reaches the total.

use super::types::{NextPage, PaginationState};

/// Offset-based paginator with a fixed page size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPaginator {
    /// Query parameter name for offset
    pub offset_param: String,
    /// Query parameter name for page size
    pub limit_param: String,
    /// Number of records per page
    pub page_size: u32,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(
        offset_param: impl Into<String>,
        limit_param: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            offset_param: offset_param.into(),
            limit_param: limit_param.into(),
            page_size: page_size.max(1),
        }
    }

    /// Query parameters for a request at the given offset
    pub fn params(&self, offset: u64) -> [(String, String); 2] {
        [
            (self.limit_param.clone(), self.page_size.to_string()),
            (self.offset_param.clone(), offset.to_string()),
        ]
    }

    /// Record a successful page and decide whether another is needed
    pub fn process_page(
        &self,
        records_count: usize,
        total_available: u64,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.total = Some(total_available);
        state.pages += 1;
        state.add_offset(u64::from(self.page_size));

        if state.offset >= total_available {
            state.mark_done();
            return NextPage::Done;
        }

        NextPage::Continue {
            offset: state.offset,
        }
    }
}
