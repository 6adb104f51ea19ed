//! Error types.
//!
//! [`SchemaError`] and [`SchemaErrors`] describe *data* mismatches; they are
//! an ordinary outcome of validation. [`Error`] covers the conditions that
//! abort a validation request before any outcome can be produced.

mod schema_error;

pub use schema_error::{SchemaError, SchemaErrors, REQUIRED_KEYWORD};

use crate::engine::EngineError;
use crate::resolver::ResolveError;

/// Fatal failures of a validation request.
///
/// None of these are retried; each names the missing piece so the caller can
/// fix the request rather than the data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No schema was supplied.
    #[error("a schema is required to validate data")]
    MissingSchema,

    /// The schema could not be located inside the API description document.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The validation engine rejected the schema.
    #[error(transparent)]
    Engine(#[from] EngineError),
}
