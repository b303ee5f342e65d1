//! Gather types

use crate::harvest::HarvestStats;
use crate::schema::{count_leaves, SynthesisOptions};
use crate::types::SchemaFormat;
use serde_json::Value;

/// Options for discover mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// Encoding of the written schema
    pub format: SchemaFormat,
    /// Header synthesis options
    pub synthesis: SynthesisOptions,
}

impl DiscoverOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output encoding
    #[must_use]
    pub fn with_format(mut self, format: SchemaFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the synthesis options
    #[must_use]
    pub fn with_synthesis(mut self, synthesis: SynthesisOptions) -> Self {
        self.synthesis = synthesis;
        self
    }
}

/// Statistics for a gather run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherStats {
    /// Harvest counters
    pub harvest: HarvestStats,
    /// Lines written to the sink, header included
    pub lines_written: u64,
    /// Leaf count of the retained sample (discover mode)
    pub sample_leaves: Option<usize>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// The record with the most traversal leaves seen so far
///
/// Ties keep the earlier record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichestSample {
    best: Option<(usize, Value)>,
}

impl RichestSample {
    /// Create an empty sample
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record; returns true if it became the new best
    pub fn offer(&mut self, record: Value) -> bool {
        let leaves = count_leaves(&record);
        self.offer_counted(leaves, record)
    }

    fn offer_counted(&mut self, leaves: usize, record: Value) -> bool {
        match &self.best {
            Some((best, _)) if leaves <= *best => false,
            _ => {
                self.best = Some((leaves, record));
                true
            }
        }
    }

    /// Combine with a sample drawn from records that came later
    ///
    /// `a.merge(b).merge(c) == a.merge(b.merge(c))`, so partial samples can
    /// be folded in window order.
    #[must_use]
    pub fn merge(mut self, later: Self) -> Self {
        if let Some((leaves, record)) = later.best {
            self.offer_counted(leaves, record);
        }
        self
    }

    /// Leaf count of the retained record
    pub fn leaf_count(&self) -> Option<usize> {
        self.best.as_ref().map(|(leaves, _)| *leaves)
    }

    /// The retained record
    pub fn record(&self) -> Option<&Value> {
        self.best.as_ref().map(|(_, record)| record)
    }

    /// Take the retained record
    pub fn into_record(self) -> Option<Value> {
        self.best.map(|(_, record)| record)
    }

    /// Check whether any record was offered
    pub fn is_empty(&self) -> bool {
        self.best.is_none()
    }
}
