//! Schema file loading
//!
//! Accepts both encodings: the line-oriented text form and the structured
//! JSON form (detected by a leading `{`).

use super::types::{FieldDefinition, Schema};
use crate::error::{Error, Result};
use crate::path::{FieldPath, PathExpression, PathSegment, NULL_PATH_LITERAL};
use crate::types::SchemaFormat;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

static TEXT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9#_]+:[A-Za-z0-9]+(?:,[A-Za-z0-9]+)*$").expect("valid regex")
});

/// Detect which encoding a schema document uses
pub fn detect_format(content: &str) -> SchemaFormat {
    if content.trim_start().starts_with('{') {
        SchemaFormat::Structured
    } else {
        SchemaFormat::Text
    }
}

/// Load a schema file in either encoding
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    let source = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::malformed_schema(&source, 0, "file does not exist")
        } else {
            Error::malformed_schema(&source, 0, format!("failed to read file: {e}"))
        }
    })?;

    let schema = parse_schema(&content, &source)?;
    debug!("Loaded {} schema fields from {}", schema.len(), source);
    Ok(schema)
}

/// Parse a schema document in either encoding
pub fn parse_schema(content: &str, source: &str) -> Result<Schema> {
    if content.trim().is_empty() {
        return Err(Error::malformed_schema(source, 0, "file has no content"));
    }

    match detect_format(content) {
        SchemaFormat::Text => parse_text_schema(content, source),
        SchemaFormat::Structured => parse_structured_schema(content, source),
    }
}

/// Parse the `HEADER:SEG[,SEG...]` text form
///
/// Blank lines are skipped; every other line must match the format.
pub fn parse_text_schema(content: &str, source: &str) -> Result<Schema> {
    let mut schema = Schema::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if !TEXT_LINE.is_match(line) {
            return Err(Error::malformed_schema(
                source,
                line_no,
                "expected [CSV_HEADER]:[DATA],[DATA],...,[DATA]",
            ));
        }

        let (header, segments) = line
            .split_once(':')
            .ok_or_else(|| Error::malformed_schema(source, line_no, "missing ':'"))?;
        let path = FieldPath::parse(segments.split(','))
            .ok_or_else(|| Error::malformed_schema(source, line_no, "empty path"))?;

        push_field(&mut schema, FieldDefinition::new(header, path), source, line_no)?;
    }

    if schema.is_empty() {
        return Err(Error::malformed_schema(source, 0, "file has no content"));
    }

    Ok(schema)
}

/// Parse the structured form: one JSON object of header -> segment array
pub fn parse_structured_schema(content: &str, source: &str) -> Result<Schema> {
    let StructuredMembers(members) = serde_json::from_str(content)
        .map_err(|e| Error::malformed_schema(source, e.line(), e.to_string()))?;

    let mut schema = Schema::new();

    for (position, (header, segments)) in members.into_iter().enumerate() {
        let entry = position + 1;
        if header.is_empty() {
            return Err(Error::malformed_schema(source, entry, "empty header"));
        }

        let Value::Array(segments) = segments else {
            return Err(Error::malformed_schema(
                source,
                entry,
                format!("'{header}' must map to an array of segments"),
            ));
        };

        let path = structured_path(&segments)
            .map_err(|message| Error::malformed_schema(source, entry, message))?;
        push_field(&mut schema, FieldDefinition::new(header, path), source, entry)?;
    }

    Ok(schema)
}

/// Members of a structured schema in document order, repeated headers kept
struct StructuredMembers(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for StructuredMembers {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MembersVisitor;

        impl<'de> Visitor<'de> for MembersVisitor {
            type Value = StructuredMembers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object of header to segment array")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(member) = map.next_entry::<String, serde_json::Value>()? {
                    members.push(member);
                }
                Ok(StructuredMembers(members))
            }
        }

        deserializer.deserialize_map(MembersVisitor)
    }
}

/// Convert a JSON segment array into a field path
fn structured_path(segments: &[Value]) -> std::result::Result<FieldPath, String> {
    if let Some(Value::String(first)) = segments.first() {
        if first == NULL_PATH_LITERAL {
            return Ok(FieldPath::NullPath);
        }
    }

    let parsed = segments
        .iter()
        .map(|segment| match segment {
            Value::String(literal) => Ok(PathSegment::parse(literal)),
            Value::Number(n) => n
                .as_u64()
                .map(|position| PathSegment::Index(position as usize))
                .ok_or_else(|| format!("index {n} is not a non-negative integer")),
            other => Err(format!("unsupported segment {other}")),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    PathExpression::new(parsed)
        .map(FieldPath::Path)
        .ok_or_else(|| "empty path".to_string())
}

fn push_field(
    schema: &mut Schema,
    field: FieldDefinition,
    source: &str,
    line: usize,
) -> Result<()> {
    if schema.contains(&field.header) {
        return Err(Error::malformed_schema(
            source,
            line,
            format!("duplicate header '{}'", field.header),
        ));
    }
    schema.push(field)
}
