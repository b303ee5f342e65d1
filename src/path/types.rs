//! Path segment and path expression types

use serde::{Serialize, Serializer};
use std::fmt;

/// Literal that marks a field with no source value
pub const NULL_PATH_LITERAL: &str = "null";

/// One step of addressing into a JSON document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member name
    Key(String),
    /// Zero-based array position
    Index(usize),
}

impl PathSegment {
    /// Create a key segment
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Create an index segment
    pub fn index(position: usize) -> Self {
        Self::Index(position)
    }

    /// Classify a literal once: purely numeric text becomes an index
    ///
    /// Digit strings too large for `usize` stay keys, since no array
    /// could be addressed by them anyway.
    pub fn parse(literal: &str) -> Self {
        if is_numeric_literal(literal) {
            if let Ok(position) = literal.parse::<usize>() {
                return Self::Index(position);
            }
        }
        Self::Key(literal.to_string())
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => f.write_str(name),
            Self::Index(position) => write!(f, "{position}"),
        }
    }
}

impl Serialize for PathSegment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Key(name) => serializer.serialize_str(name),
            Self::Index(position) => serializer.serialize_u64(*position as u64),
        }
    }
}

/// Check whether a literal consists only of ASCII digits
pub fn is_numeric_literal(literal: &str) -> bool {
    !literal.is_empty() && literal.bytes().all(|b| b.is_ascii_digit())
}

/// Ordered, non-empty sequence of segments addressing one leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PathExpression {
    segments: Vec<PathSegment>,
}

impl PathExpression {
    /// Create a path expression; returns `None` for an empty sequence
    pub fn new(segments: Vec<PathSegment>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Build a path from literals, classifying each one
    pub fn parse<I, S>(literals: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            literals
                .into_iter()
                .map(|literal| PathSegment::parse(literal.as_ref()))
                .collect(),
        )
    }

    /// Borrow the segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments (always at least one)
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over the segments
    pub fn iter(&self) -> std::slice::Iter<'_, PathSegment> {
        self.segments.iter()
    }

    /// Render as a comma-separated literal list (schema text form)
    pub fn to_text(&self) -> String {
        self.segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.segments.iter().map(ToString::to_string).collect();
        f.write_str(&rendered.join("."))
    }
}

impl<'a> IntoIterator for &'a PathExpression {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Where a schema field takes its value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPath {
    /// A real traversal path into each record
    Path(PathExpression),
    /// No source value; the row counter fills the column
    NullPath,
}

impl FieldPath {
    /// Build a field path from literals; a leading `null` selects the row counter
    pub fn parse<I, S>(literals: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let literals: Vec<S> = literals.into_iter().collect();
        match literals.first() {
            Some(first) if first.as_ref() == NULL_PATH_LITERAL => Some(Self::NullPath),
            _ => PathExpression::parse(literals).map(Self::Path),
        }
    }

    /// Check if this is the row-counter sentinel
    pub fn is_null_path(&self) -> bool {
        matches!(self, Self::NullPath)
    }

    /// Get the real path, if any
    pub fn as_path(&self) -> Option<&PathExpression> {
        match self {
            Self::Path(path) => Some(path),
            Self::NullPath => None,
        }
    }
}

impl From<PathExpression> for FieldPath {
    fn from(path: PathExpression) -> Self {
        Self::Path(path)
    }
}
