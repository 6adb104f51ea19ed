//! Mismatch annotation.
//!
//! [`annotate`] validates data against a schema and produces a deep copy of
//! the data in which every flagged location is replaced by a descriptive
//! string. The input data is never modified.

use serde_json::Value;
use stillwater::Validation;

use crate::engine::{EngineError, SchemaEngine};
use crate::error::{SchemaError, SchemaErrors};
use crate::styles::IssueStyleConfig;

/// The result of annotating one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Engine errors in engine order, or `None` when the data is valid.
    pub errors: Option<SchemaErrors>,
    /// Deep copy of the data with each mismatch replaced by its annotation.
    pub data_mismatches: Value,
}

/// Compiles `schema` under `id`, validates `data`, and annotates the result.
///
/// Missing required properties are written at the parent's path plus the
/// property name, creating intermediate containers where needed. Every other
/// error replaces the value at its instance path with the error icon, the
/// original value and the engine's message. Values are always read from
/// `data`, never from the partially annotated copy, so the order of errors
/// cannot change what gets rendered.
///
/// # Errors
///
/// Returns `EngineError` if the schema cannot be compiled. Invalid data is
/// not an error.
///
/// # Example
///
/// ```rust
/// use autopsy::{annotate, IssueStyleConfig, SchemaEngine};
/// use serde_json::json;
///
/// let engine = SchemaEngine::new();
/// let schema = json!({
///     "type": "object",
///     "properties": {"name": {"type": "string"}},
///     "required": ["name", "age"]
/// });
/// let data = json!({"name": 7});
///
/// let annotation = annotate(&engine, "urn:example:user", &schema, &data, &IssueStyleConfig::default())
///     .unwrap();
///
/// assert_eq!(annotation.errors.unwrap().len(), 2);
/// assert_eq!(annotation.data_mismatches["age"], "⚠️ Missing property 'age'");
/// assert_eq!(annotation.data_mismatches["name"], "❌ '7' 7 is not of type \"string\"");
/// assert_eq!(data, json!({"name": 7}));
/// ```
pub fn annotate(
    engine: &SchemaEngine,
    id: &str,
    schema: &Value,
    data: &Value,
    styles: &IssueStyleConfig,
) -> Result<Annotation, EngineError> {
    let validator = engine.compile(id, schema)?;
    let mut data_mismatches = data.clone();

    let errors = match engine.check(&validator, data) {
        Validation::Success(()) => None,
        Validation::Failure(errors) => {
            for error in errors.iter() {
                mark(&mut data_mismatches, data, error, styles);
            }
            Some(errors)
        }
    };

    tracing::debug!(
        schema_id = id,
        errors = errors.as_ref().map_or(0, SchemaErrors::len),
        "validated data"
    );

    Ok(Annotation {
        errors,
        data_mismatches,
    })
}

fn mark(target: &mut Value, original: &Value, error: &SchemaError, styles: &IssueStyleConfig) {
    let path = error.target_path();
    let text = match (&error.missing_property, error.is_missing_property()) {
        (Some(name), true) => styles.missing_property(name),
        _ => styles.property_error(&render(error.path.get(original)), &error.message),
    };

    if path.set(target, Value::String(text)) {
        tracing::trace!(path = %path, keyword = %error.keyword, "annotated mismatch");
    } else {
        tracing::trace!(path = %path, keyword = %error.keyword, "location already annotated");
    }
}

/// Renders a value for display inside an annotation; strings appear
/// without their JSON quotes and absent values as `undefined`.
fn render(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
