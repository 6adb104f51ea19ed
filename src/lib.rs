//! # Autopsy
//!
//! Validates runtime data against a JSON Schema and returns an annotated copy
//! of the data in which every mismatch is flagged in place.
//!
//! ## Overview
//!
//! The schema can be given directly, or embedded in an OpenAPI 3 or Swagger 2
//! document. For a document, the caller names the response schema by
//! endpoint, method and status; autopsy locates it (falling back to the
//! `default` response), carries the document's shared definitions along so
//! internal `$ref`s resolve, and compiles it with the `jsonschema` engine.
//!
//! Invalid data is not an error: the outcome carries the engine's error list
//! and a deep copy of the data where each failing value is replaced by an
//! icon, the original value and the failure message, and each missing
//! required property is added with a "missing" marker.
//!
//! ## Core Types
//!
//! - [`Inspector`]: entry point owning the [`SchemaEngine`]
//! - [`ValidationOutcome`]: errors, annotated data and the styling used
//! - [`SchemaDocument`] / [`PathLocator`]: what to validate against
//! - [`SchemaError`] / [`SchemaErrors`]: engine-reported mismatches
//! - [`JsonPath`]: typed paths into nested values
//!
//! ## Example
//!
//! ```rust
//! use autopsy::validate_schema;
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
//!     "required": ["name", "age"]
//! });
//! let data = json!({"name": 42});
//!
//! let outcome = validate_schema(&data, Some(&schema), None, None).unwrap();
//!
//! assert_eq!(outcome.errors.as_ref().map(|e| e.len()), Some(2));
//! assert_eq!(outcome.data_mismatches["age"], "⚠️ Missing property 'age'");
//! assert_eq!(outcome.data_mismatches["name"], "❌ '42' 42 is not of type \"string\"");
//! ```

pub mod annotate;
pub mod document;
pub mod engine;
pub mod error;
pub mod id;
pub mod inspector;
pub mod path;
pub mod resolver;
pub mod styles;

pub use annotate::{annotate, Annotation};
pub use document::{DocumentKind, PathLocator, SchemaDocument};
pub use engine::{EngineError, EngineOptions, SchemaEngine};
pub use error::{Error, SchemaError, SchemaErrors};
pub use id::SchemaId;
pub use inspector::{validate_schema, Inspector, ValidationOutcome};
pub use path::{JsonPath, PathSegment};
pub use resolver::{resolve, ResolveError, ResolvedSchema};
pub use styles::{IssueStyleConfig, IssueStyleOverrides};

/// Type alias for engine results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
