//! Common types used throughout cve-harvest
//!
//! This module contains shared type definitions and utility types
//! used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Schema Format
// ============================================================================

/// Encoding of a schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFormat {
    /// One `HEADER:SEG,SEG,...` line per field
    #[default]
    Text,
    /// A single JSON object mapping header to a segment array
    Structured,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff between transient-failure retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    #[default]
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
