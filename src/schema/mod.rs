//! Schema module
//!
//! Schema discovery and schema files.
//!
//! # Features
//!
//! - **Leaf Traversal**: Lazy depth-first walk producing one path per scalar
//! - **Header Synthesis**: Readable, disambiguated headers from trailing path segments
//! - **Two Encodings**: `HEADER:SEG,...` text lines or a structured JSON object
//! - **Validation**: Line-format checks and header uniqueness on load

mod loader;
mod synthesize;
mod traverse;
mod types;

pub use loader::{
    detect_format, load_schema, parse_schema, parse_structured_schema, parse_text_schema,
};
pub use synthesize::{
    derive_header, synthesize, HeaderRegistry, SynthesisOptions, DEFAULT_MAX_HEADER_PARTS,
};
pub use traverse::{count_leaves, traverse, Leaf, Traversal};
pub use types::{FieldDefinition, Schema};
