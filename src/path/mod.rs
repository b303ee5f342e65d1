//! Path module
//!
//! Tagged path segments and the value extractor that applies them.
//!
//! # Overview
//!
//! A [`PathExpression`] is decided once, when a schema is built: every
//! literal that is purely numeric becomes a [`PathSegment::Index`], every
//! other literal a [`PathSegment::Key`]. Extraction then walks a record
//! one segment at a time and reports a miss as `None`.

mod extract;
mod types;

pub use extract::{extract, is_scalar, value_text};
pub use types::{is_numeric_literal, FieldPath, PathExpression, PathSegment, NULL_PATH_LITERAL};
