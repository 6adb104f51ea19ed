//! The validation entry point.
//!
//! [`Inspector`] owns a [`SchemaEngine`] and runs the whole pipeline for one
//! request: classify the schema, resolve it out of an API document when
//! needed, then validate and annotate the data.

use serde::Serialize;
use serde_json::Value;

use crate::annotate::annotate;
use crate::document::{PathLocator, SchemaDocument};
use crate::engine::SchemaEngine;
use crate::error::{Error, SchemaErrors};
use crate::id::SchemaId;
use crate::resolver::resolve;
use crate::styles::{IssueStyleConfig, IssueStyleOverrides};

/// Everything a validation request produces.
///
/// Serializes as `{"errors": [...] | null, "dataMismatches": ..., "issuesStyles": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Engine errors, or `None` when the data is valid.
    pub errors: Option<SchemaErrors>,
    /// Annotated deep copy of the data.
    pub data_mismatches: Value,
    /// Styling used for the annotations.
    pub issues_styles: IssueStyleConfig,
}

impl ValidationOutcome {
    /// Returns true if the data conforms to the schema.
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }
}

/// Runs validation requests against an owned [`SchemaEngine`].
///
/// Each request compiles its schema under a fresh id, so the engine's
/// registry grows by one entry per call. Use [`Inspector::reset`] to release
/// compiled validators in long-running processes.
///
/// # Example
///
/// ```rust
/// use autopsy::{Inspector, PathLocator};
/// use serde_json::json;
///
/// let doc = json!({
///     "openapi": "3.0.0",
///     "paths": {"/users": {"get": {"responses": {"200": {"content": {
///         "application/json": {"schema": {"$ref": "#/components/schemas/User"}}
///     }}}}}},
///     "components": {"schemas": {"User": {
///         "type": "object",
///         "properties": {"name": {"type": "string"}},
///         "required": ["name"]
///     }}}
/// });
///
/// let inspector = Inspector::new();
/// let mut locator = PathLocator::endpoint("/users");
/// let outcome = inspector
///     .validate_schema(&json!({}), Some(&doc), Some(&mut locator), None)
///     .unwrap();
///
/// assert!(!outcome.is_valid());
/// assert_eq!(outcome.data_mismatches["name"], "⚠️ Missing property 'name'");
/// assert_eq!(locator.status, Some(200));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    engine: SchemaEngine,
    styles: IssueStyleConfig,
}

impl Inspector {
    /// Creates an inspector with a fresh engine and the built-in styling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an inspector around an existing engine.
    pub fn with_engine(engine: SchemaEngine) -> Self {
        Self {
            engine,
            styles: IssueStyleConfig::default(),
        }
    }

    /// Replaces the base styling that per-request overrides are merged onto.
    pub fn with_styles(mut self, styles: IssueStyleConfig) -> Self {
        self.styles = styles;
        self
    }

    /// Returns the engine handle.
    pub fn engine(&self) -> &SchemaEngine {
        &self.engine
    }

    /// Returns the base styling.
    pub fn styles(&self) -> &IssueStyleConfig {
        &self.styles
    }

    /// Drops every validator the engine has compiled.
    pub fn reset(&self) {
        self.engine.reset();
    }

    /// Validates `data` against `schema` and annotates every mismatch.
    ///
    /// When `locator` is given, its method and status are defaulted in place
    /// to `GET` and `200`. If `schema` is a Swagger or OpenAPI document the
    /// schema is resolved through the locator; a plain schema ignores it.
    /// `issue_styles` overrides the base styling field by field.
    ///
    /// # Errors
    ///
    /// - `Error::MissingSchema` if `schema` is `None` or `null`.
    /// - `Error::Resolve` if the schema cannot be located in the document,
    ///   including when a document is given without a locator.
    /// - `Error::Engine` if the schema does not compile.
    pub fn validate_schema(
        &self,
        data: &Value,
        schema: Option<&Value>,
        locator: Option<&mut PathLocator>,
        issue_styles: Option<&IssueStyleOverrides>,
    ) -> Result<ValidationOutcome, Error> {
        let schema = schema.filter(|s| !s.is_null()).ok_or(Error::MissingSchema)?;
        let document = SchemaDocument::classify(schema);
        tracing::debug!(kind = %document.kind(), "validating data");

        let locator = locator.map(|locator| {
            locator.apply_defaults();
            &*locator
        });

        let (id, schema) = if document.is_api_document() {
            let resolved = resolve(document, &locator.cloned().unwrap_or_default())?;
            (resolved.id().clone(), resolved.into_schema())
        } else {
            (SchemaId::generate("plain"), schema.clone())
        };

        let issues_styles = match issue_styles {
            Some(overrides) => self.styles.merged(overrides),
            None => self.styles.clone(),
        };

        let annotation = annotate(&self.engine, id.as_str(), &schema, data, &issues_styles)?;

        Ok(ValidationOutcome {
            errors: annotation.errors,
            data_mismatches: annotation.data_mismatches,
            issues_styles,
        })
    }
}

/// Validates `data` with a call-scoped [`Inspector`].
///
/// Nothing compiled here outlives the call.
///
/// ```rust
/// use autopsy::validate_schema;
/// use serde_json::json;
///
/// let schema = json!({"type": "object", "required": ["name", "age"]});
/// let data = json!({"name": "Alice"});
///
/// let outcome = validate_schema(&data, Some(&schema), None, None).unwrap();
/// assert_eq!(outcome.data_mismatches["age"], "⚠️ Missing property 'age'");
/// assert_eq!(outcome.data_mismatches["name"], "Alice");
/// ```
pub fn validate_schema(
    data: &Value,
    schema: Option<&Value>,
    locator: Option<&mut PathLocator>,
    issue_styles: Option<&IssueStyleOverrides>,
) -> Result<ValidationOutcome, Error> {
    Inspector::new().validate_schema(data, schema, locator, issue_styles)
}
