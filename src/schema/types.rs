//! Schema types
//!
//! A schema is the ordered list of output columns, each bound to the
//! path its values are read from.

use crate::error::{Error, Result};
use crate::path::{FieldPath, NULL_PATH_LITERAL};
use std::collections::HashSet;

/// One output column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Column header
    pub header: String,
    /// Source of the column's values
    pub path: FieldPath,
}

impl FieldDefinition {
    /// Create a field definition
    pub fn new(header: impl Into<String>, path: impl Into<FieldPath>) -> Self {
        Self {
            header: header.into(),
            path: path.into(),
        }
    }

    /// Create a row-counter column
    pub fn counter(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            path: FieldPath::NullPath,
        }
    }

    /// Render as a `HEADER:SEG,SEG` line
    pub fn to_text_line(&self) -> String {
        match &self.path {
            FieldPath::Path(path) => format!("{}:{}", self.header, path.to_text()),
            FieldPath::NullPath => format!("{}:{NULL_PATH_LITERAL}", self.header),
        }
    }

    /// Render as a `"HEADER":[SEG,...]` member
    fn to_structured_member(&self) -> Result<String> {
        let header = serde_json::to_string(&self.header)?;
        let segments = match &self.path {
            FieldPath::Path(path) => serde_json::to_string(path)?,
            FieldPath::NullPath => format!("[\"{NULL_PATH_LITERAL}\"]"),
        };
        Ok(format!("{header}:{segments}"))
    }
}

/// Ordered, header-unique list of field definitions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema, rejecting duplicate headers
    pub fn from_fields(fields: Vec<FieldDefinition>) -> Result<Self> {
        let mut schema = Self::new();
        for field in fields {
            schema.push(field)?;
        }
        Ok(schema)
    }

    /// Append a field, rejecting a duplicate header
    pub fn push(&mut self, field: FieldDefinition) -> Result<()> {
        if self.contains(&field.header) {
            return Err(Error::config(format!(
                "Duplicate schema header: {}",
                field.header
            )));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Append a field whose header came from a `HeaderRegistry`
    pub(crate) fn push_claimed(&mut self, field: FieldDefinition) {
        debug_assert!(!self.contains(&field.header));
        self.fields.push(field);
    }

    /// Check if a header is already present
    pub fn contains(&self, header: &str) -> bool {
        self.fields.iter().any(|f| f.header == header)
    }

    /// Borrow the fields in column order
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Iterate over the fields
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDefinition> {
        self.fields.iter()
    }

    /// Headers in column order
    pub fn headers(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.header.as_str()).collect()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the header uniqueness invariant
    pub fn has_unique_headers(&self) -> bool {
        let mut seen = HashSet::new();
        self.fields.iter().all(|f| seen.insert(f.header.as_str()))
    }

    /// Render the text form, one line per field
    pub fn to_text(&self) -> String {
        self.fields
            .iter()
            .map(FieldDefinition::to_text_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the structured form, a single JSON object
    pub fn to_structured(&self) -> Result<String> {
        if self.fields.is_empty() {
            return Ok("{}".to_string());
        }

        let members = self
            .fields
            .iter()
            .map(|f| f.to_structured_member().map(|m| format!("\t{m}")))
            .collect::<Result<Vec<_>>>()?;

        Ok(format!("{{\n{}\n}}", members.join(",\n")))
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDefinition;
    type IntoIter = std::slice::Iter<'a, FieldDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
