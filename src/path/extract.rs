//! Value extraction by path expression
//!
//! Extraction is total: a missing key, an out-of-range index or a type
//! mismatch yields `None` and never an error.

use super::types::{PathExpression, PathSegment};
use serde_json::Value;
use std::borrow::Cow;

/// Apply a path to a record and return the addressed value
pub fn extract<'a>(record: &'a Value, path: &PathExpression) -> Option<&'a Value> {
    path.iter().try_fold(record, step)
}

/// Descend one segment
fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (segment, current) {
        (PathSegment::Key(name), Value::Object(map)) => map.get(name),
        (PathSegment::Index(position), Value::Array(items)) => items.get(*position),
        _ => None,
    }
}

/// String form of a JSON value
///
/// Strings are returned without quotes; compound values fall back to
/// compact JSON text.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed("null"),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Check whether a value is a leaf (neither object nor array)
pub fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
