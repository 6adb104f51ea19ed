//! Validation engine resource.
//!
//! This module provides [`SchemaEngine`], a handle around the `jsonschema`
//! crate that compiles schemas and keeps every compiled validator in a
//! registry keyed by schema id. The registry is append-only; call
//! [`SchemaEngine::reset`] to release it.

use std::sync::Arc;

use indexmap::IndexMap;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use parking_lot::RwLock;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{SchemaError, SchemaErrors, REQUIRED_KEYWORD};
use crate::path::JsonPath;
use crate::ValidationResult;

/// Type alias for the compiled validator storage.
type ValidatorMap = Arc<RwLock<IndexMap<String, Arc<Validator>>>>;

/// Options applied to every schema the engine compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Enforce `format` keywords (email, uuid, date-time, ...).
    pub validate_formats: bool,
    /// Force a draft instead of letting the engine detect it from `$schema`.
    pub draft: Option<Draft>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            validate_formats: true,
            draft: None,
        }
    }
}

/// A thread-safe validation engine with a registry of compiled schemas.
///
/// Cloning a `SchemaEngine` yields another handle onto the same registry.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`:
/// - Lookups and validation can run concurrently (read access)
/// - Compilation registers under a write lock
///
/// # Example
///
/// ```rust
/// use autopsy::SchemaEngine;
/// use serde_json::json;
///
/// let engine = SchemaEngine::new();
/// let validator = engine
///     .compile("urn:example:name", &json!({"type": "string"}))
///     .unwrap();
///
/// assert!(engine.check(&validator, &json!("Alice")).is_success());
/// assert!(engine.check(&validator, &json!(42)).is_failure());
/// assert_eq!(engine.len(), 1);
///
/// engine.reset();
/// assert!(engine.is_empty());
/// ```
pub struct SchemaEngine {
    compiled: ValidatorMap,
    options: EngineOptions,
}

impl SchemaEngine {
    /// Creates an engine with default options and an empty registry.
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Creates an engine with the given options and an empty registry.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            compiled: Arc::new(RwLock::new(IndexMap::new())),
            options,
        }
    }

    /// Enables or disables `format` enforcement.
    ///
    /// ```rust
    /// use autopsy::SchemaEngine;
    ///
    /// let engine = SchemaEngine::new().with_format_validation(false);
    /// assert!(!engine.options().validate_formats);
    /// ```
    pub fn with_format_validation(mut self, enabled: bool) -> Self {
        self.options.validate_formats = enabled;
        self
    }

    /// Forces every schema to be compiled under `draft`.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.options.draft = Some(draft);
        self
    }

    /// Returns the options used for compilation.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compiles `schema` and registers the validator under `id`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DuplicateId` if `id` is already registered, and
    /// `EngineError::SchemaCompilation` if the engine rejects the schema.
    pub fn compile(
        &self,
        id: impl Into<String>,
        schema: &Value,
    ) -> Result<Arc<Validator>, EngineError> {
        let id = id.into();
        if self.compiled.read().contains_key(&id) {
            return Err(EngineError::DuplicateId(id));
        }

        let mut options = jsonschema::options();
        options.should_validate_formats(self.options.validate_formats);
        if let Some(draft) = self.options.draft {
            options.with_draft(draft);
        }

        let validator = options
            .build(schema)
            .map(Arc::new)
            .map_err(|e| EngineError::SchemaCompilation {
                id: id.clone(),
                reason: e.to_string(),
            })?;

        let mut compiled = self.compiled.write();
        if compiled.contains_key(&id) {
            return Err(EngineError::DuplicateId(id));
        }
        compiled.insert(id.clone(), Arc::clone(&validator));
        tracing::debug!(schema_id = %id, registered = compiled.len(), "compiled schema");

        Ok(validator)
    }

    /// Retrieves a compiled validator by id.
    pub fn get(&self, id: &str) -> Option<Arc<Validator>> {
        self.compiled.read().get(id).cloned()
    }

    /// Returns the registered ids, oldest first.
    pub fn ids(&self) -> Vec<String> {
        self.compiled.read().keys().cloned().collect()
    }

    /// Returns the number of compiled validators held by the registry.
    pub fn len(&self) -> usize {
        self.compiled.read().len()
    }

    /// Returns true if no validator has been compiled since the last reset.
    pub fn is_empty(&self) -> bool {
        self.compiled.read().is_empty()
    }

    /// Drops every compiled validator.
    ///
    /// Validators already handed out stay usable; they are freed when the
    /// last `Arc` goes away.
    pub fn reset(&self) {
        let mut compiled = self.compiled.write();
        tracing::debug!(released = compiled.len(), "resetting schema engine");
        compiled.clear();
    }

    /// Runs `validator` against `data`.
    ///
    /// Returns `Validation::Success(())` for conforming data, or
    /// `Validation::Failure` with every error the engine reported, in the
    /// engine's order.
    pub fn check(&self, validator: &Validator, data: &Value) -> ValidationResult<()> {
        let errors: Vec<SchemaError> = validator
            .iter_errors(data)
            .map(|e| {
                let instance_path = e.instance_path.to_string();
                let schema_path = e.schema_path.to_string();
                let path = JsonPath::from_pointer(&instance_path, data);
                let error = SchemaError::new(path, e.to_string())
                    .with_instance_path(instance_path)
                    .with_keyword(keyword_for(&e.kind, &schema_path))
                    .with_schema_path(schema_path);

                match &e.kind {
                    ValidationErrorKind::Required { property } => error
                        .with_keyword(REQUIRED_KEYWORD)
                        .with_missing_property(property_name(property)),
                    _ => error,
                }
            })
            .collect();

        match SchemaErrors::from_vec(errors) {
            None => Validation::Success(()),
            Some(errors) => Validation::Failure(errors),
        }
    }
}

impl Default for SchemaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaEngine {
    fn clone(&self) -> Self {
        Self {
            compiled: Arc::clone(&self.compiled),
            options: self.options,
        }
    }
}

impl std::fmt::Debug for SchemaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaEngine")
            .field("compiled", &self.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Keyword reported for a `false` subschema.
pub const FALSE_SCHEMA_KEYWORD: &str = "false schema";

/// Names the keyword behind an engine error.
///
/// The error kind decides; the schema pointer is only consulted for kinds
/// that do not map to a single keyword.
fn keyword_for(kind: &ValidationErrorKind, schema_path: &str) -> String {
    let keyword = match kind {
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf => "anyOf",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Contains => "contains",
        ValidationErrorKind::ContentEncoding { .. } | ValidationErrorKind::FromUtf8 { .. } => {
            "contentEncoding"
        }
        ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::FalseSchema => FALSE_SCHEMA_KEYWORD,
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::OneOfMultipleValid | ValidationErrorKind::OneOfNotValid => "oneOf",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::PropertyNames { .. } => "propertyNames",
        ValidationErrorKind::Required { .. } => REQUIRED_KEYWORD,
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::UnevaluatedItems { .. } => "unevaluatedItems",
        ValidationErrorKind::UnevaluatedProperties { .. } => "unevaluatedProperties",
        ValidationErrorKind::UniqueItems => "uniqueItems",
        _ => return keyword_from_schema_path(schema_path),
    };
    keyword.to_string()
}

/// Last token of the schema pointer (`/properties/name/type` -> `type`).
fn keyword_from_schema_path(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .replace("~1", "/")
        .replace("~0", "~")
}

fn property_name(property: &Value) -> String {
    match property {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    }
}

/// Errors raised by the validation engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine could not compile the schema.
    #[error("schema '{id}' failed to compile: {reason}")]
    SchemaCompilation {
        /// Id the schema was compiled under.
        id: String,
        /// Engine diagnostic.
        reason: String,
    },

    /// A validator is already registered under this id.
    #[error("schema id '{0}' already registered")]
    DuplicateId(String),
}
