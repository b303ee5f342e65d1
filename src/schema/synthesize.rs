//! Schema synthesis from traversal paths
//!
//! Headers are built from the trailing non-numeric segments of each path
//! and disambiguated with a per-header occurrence map.

use super::types::{FieldDefinition, Schema};
use crate::path::{is_numeric_literal, PathExpression, PathSegment};
use std::collections::{HashMap, HashSet};

/// Default number of path segments used to build a header
pub const DEFAULT_MAX_HEADER_PARTS: usize = 3;

/// Options for schema synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Maximum number of segments joined into a header
    pub max_header_parts: usize,
    /// Maximum number of definitions emitted (0 = unlimited)
    pub limit: usize,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_header_parts: DEFAULT_MAX_HEADER_PARTS,
            limit: 0,
        }
    }
}

impl SynthesisOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of header parts
    #[must_use]
    pub fn with_max_header_parts(mut self, parts: usize) -> Self {
        self.max_header_parts = parts;
        self
    }

    /// Set the definition limit
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Hands out unique headers
#[derive(Debug, Default)]
pub struct HeaderRegistry {
    occurrences: HashMap<String, usize>,
    emitted: HashSet<String>,
}

impl HeaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a header: the first occurrence keeps its text, later ones
    /// get `_<occurrence>` appended
    pub fn claim(&mut self, base: &str) -> String {
        let count = self.occurrences.entry(base.to_string()).or_insert(0);
        *count += 1;

        let mut candidate = if *count == 1 {
            base.to_string()
        } else {
            format!("{base}_{count}")
        };

        // A suffixed form may already exist as a natural header
        while self.emitted.contains(&candidate) {
            *count += 1;
            candidate = format!("{base}_{count}");
        }

        self.emitted.insert(candidate.clone());
        candidate
    }
}

/// Check whether a segment may appear in header text
fn is_header_segment(segment: &PathSegment) -> bool {
    match segment {
        PathSegment::Index(_) => false,
        PathSegment::Key(name) => !is_numeric_literal(name),
    }
}

/// Derive the undisambiguated header for a path
///
/// Walks backward from the leaf, collecting up to `max_parts` non-numeric
/// segments, nearest-to-leaf first. The root segment only names the header
/// when nothing else qualifies.
pub fn derive_header(path: &PathExpression, max_parts: usize) -> String {
    let segments = path.segments();

    let parts: Vec<String> = segments
        .iter()
        .skip(1)
        .rev()
        .filter(|segment| is_header_segment(segment))
        .take(max_parts)
        .map(ToString::to_string)
        .collect();

    if parts.is_empty() {
        return segments[0].to_string();
    }

    parts.join("_")
}

/// Build a schema from leaf paths in traversal order
pub fn synthesize<I>(leaves: I, options: SynthesisOptions) -> Schema
where
    I: IntoIterator<Item = PathExpression>,
{
    let limit = if options.limit == 0 {
        usize::MAX
    } else {
        options.limit
    };

    let mut registry = HeaderRegistry::new();
    let mut schema = Schema::new();

    for path in leaves.into_iter().take(limit) {
        let header = registry.claim(&derive_header(&path, options.max_header_parts));
        schema.push_claimed(FieldDefinition::new(header, path));
    }

    schema
}
