//! Pagination types
//!
//! Offset bookkeeping for a single harvest window.

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available starting at this offset
    Continue {
        /// Offset of the next request
        offset: u64,
    },
    /// The window is drained
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state while draining one window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Offset of the next request
    pub offset: u64,
    /// Total reported by the most recent page
    pub total: Option<u64>,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Successful pages so far
    pub pages: u32,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state at offset 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Add offset
    pub fn add_offset(&mut self, amount: u64) {
        self.offset += amount;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }

    /// Records still expected according to the last reported total
    pub fn remaining(&self) -> Option<u64> {
        self.total
            .map(|total| total.saturating_sub(self.total_fetched))
    }
}

/// Number of successful requests needed to drain `total` records
pub fn expected_pages(total: u64, page_size: u32) -> u64 {
    if total == 0 {
        // The first request is always issued to learn the total
        return 1;
    }
    total.div_ceil(u64::from(page_size.max(1)))
}
