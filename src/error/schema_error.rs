//! Structural validation error types.
//!
//! This module provides [`SchemaError`] for a single failure reported by the
//! validation engine and [`SchemaErrors`] for the ordered, non-empty list the
//! engine produces for one invalid value.

use std::fmt::{self, Display};

use serde::ser::{Serialize, Serializer};
use stillwater::prelude::*;

use crate::path::JsonPath;

/// Keyword the engine reports for a missing required property.
pub const REQUIRED_KEYWORD: &str = "required";

/// A single structural validation error with full context.
///
/// `SchemaError` captures what the engine said about one location:
/// - **path**: typed path to the failing value inside the validated data
/// - **instance_path**: the same location as the engine's JSON Pointer
/// - **keyword**: which constraint failed (`type`, `required`, `format`, ...)
/// - **message**: the engine's human-readable description
/// - **schema_path**: JSON Pointer to the failing keyword inside the schema
/// - **missing_property**: for `required` failures, the absent property name
///
/// # Example
///
/// ```rust
/// use autopsy::{JsonPath, SchemaError};
///
/// let error = SchemaError::new(JsonPath::root(), "\"age\" is a required property")
///     .with_keyword("required")
///     .with_missing_property("age");
///
/// assert!(error.is_missing_property());
/// assert_eq!(error.target_path().to_string(), "age");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaError {
    /// The typed path to the value that failed validation.
    #[serde(skip)]
    pub path: JsonPath,
    /// JSON Pointer to the value that failed validation (empty for the root).
    pub instance_path: String,
    /// The constraint keyword that failed.
    pub keyword: String,
    /// Human-readable error message.
    pub message: String,
    /// JSON Pointer to the failing keyword inside the schema.
    pub schema_path: String,
    /// Name of the missing property, for `required` failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_property: Option<String>,
}

impl SchemaError {
    /// Creates a new schema error with the given path and message.
    ///
    /// The keyword defaults to "validation_error". Use `with_keyword` to set
    /// the real one.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            instance_path: String::new(),
            keyword: "validation_error".to_string(),
            message: message.into(),
            schema_path: String::new(),
            missing_property: None,
        }
    }

    /// Sets the keyword and returns self for chaining.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    /// Sets the raw instance pointer and returns self for chaining.
    pub fn with_instance_path(mut self, pointer: impl Into<String>) -> Self {
        self.instance_path = pointer.into();
        self
    }

    /// Sets the schema pointer and returns self for chaining.
    pub fn with_schema_path(mut self, pointer: impl Into<String>) -> Self {
        self.schema_path = pointer.into();
        self
    }

    /// Sets the missing property name and returns self for chaining.
    pub fn with_missing_property(mut self, name: impl Into<String>) -> Self {
        self.missing_property = Some(name.into());
        self
    }

    /// Returns true if this error reports a missing required property.
    pub fn is_missing_property(&self) -> bool {
        self.keyword == REQUIRED_KEYWORD && self.missing_property.is_some()
    }

    /// Returns the location this error should be reported at.
    ///
    /// For a missing property that is the parent object's path with the
    /// property name appended; for every other error it is the instance path.
    pub fn target_path(&self) -> JsonPath {
        match (&self.missing_property, self.keyword.as_str()) {
            (Some(name), REQUIRED_KEYWORD) => self.path.push_field(name.clone()),
            _ => self.path.clone(),
        }
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {} [{}]", path_str, self.message, self.keyword)
    }
}

impl std::error::Error for SchemaError {}

// SchemaError only holds owned Strings and a JsonPath; keep it shareable
// across threads if fields change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

/// A non-empty, ordered collection of structural validation errors.
///
/// `SchemaErrors` wraps a `NonEmptyVec<SchemaError>`, so a valid value is
/// represented by the absence of a `SchemaErrors` rather than an empty list.
/// The order is the order the engine reported the errors in.
///
/// # Combining Errors
///
/// `SchemaErrors` implements `Semigroup`:
///
/// ```rust
/// use autopsy::{JsonPath, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let errors1 = SchemaErrors::single(
///     SchemaError::new(JsonPath::root(), "\"name\" is a required property")
///         .with_keyword("required")
///         .with_missing_property("name")
/// );
/// let errors2 = SchemaErrors::single(
///     SchemaError::new(JsonPath::from_field("email"), "\"x\" is not a \"email\"")
///         .with_keyword("format")
/// );
///
/// let combined = errors1.combine(errors2);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.missing_properties(), vec!["name"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a `SchemaErrors` containing a single error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `SchemaErrors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<SchemaError>) -> Self {
        Self(errors)
    }

    /// Creates a `SchemaErrors` from a `Vec<SchemaError>`.
    ///
    /// Returns `None` for an empty vec.
    pub fn from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = NonEmptyVec::singleton(errors.next()?);
        let all = errors.fold(head, |acc, error| acc.combine(NonEmptyVec::singleton(error)));
        Some(Self(all))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors, in engine order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all errors at the specified instance path.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors raised by the specified keyword.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.keyword == keyword).collect()
    }

    /// Returns the names of all missing required properties, in engine order.
    pub fn missing_properties(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.is_missing_property())
            .filter_map(|e| e.missing_property.as_deref())
            .collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<SchemaError>`.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<SchemaError> {
        &self.0
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl Serialize for SchemaErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaErrors {
    type Item = &'a SchemaError;
    type IntoIter = Box<dyn Iterator<Item = &'a SchemaError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaErrors>();
    assert_sync::<SchemaErrors>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(parent: JsonPath, name: &str) -> SchemaError {
        SchemaError::new(parent, format!("\"{}\" is a required property", name))
            .with_keyword(REQUIRED_KEYWORD)
            .with_missing_property(name)
    }

    #[test]
    fn test_schema_error_creation() {
        let error = SchemaError::new(JsonPath::from_field("name"), "1 is not of type \"string\"");

        assert_eq!(error.path, JsonPath::from_field("name"));
        assert_eq!(error.keyword, "validation_error");
        assert!(error.missing_property.is_none());
        assert!(!error.is_missing_property());
    }

    #[test]
    fn test_target_path_for_missing_property() {
        let error = missing(JsonPath::from_field("user"), "age");
        assert_eq!(error.target_path().to_string(), "user.age");
    }

    #[test]
    fn test_target_path_for_constraint_failure() {
        let error = SchemaError::new(JsonPath::from_field("name"), "bad").with_keyword("type");
        assert_eq!(error.target_path(), JsonPath::from_field("name"));
    }

    #[test]
    fn test_display_root() {
        let error = missing(JsonPath::root(), "name");
        assert_eq!(
            error.to_string(),
            "(root): \"name\" is a required property [required]"
        );
    }

    #[test]
    fn test_from_vec_empty_is_none() {
        assert!(SchemaErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_filters() {
        let errors = SchemaErrors::from_vec(vec![
            missing(JsonPath::root(), "name"),
            SchemaError::new(JsonPath::from_field("age"), "bad").with_keyword("type"),
            missing(JsonPath::root(), "email"),
        ])
        .unwrap();

        assert_eq!(errors.with_keyword("required").len(), 2);
        assert_eq!(errors.at_path(&JsonPath::from_field("age")).len(), 1);
        assert_eq!(errors.missing_properties(), vec!["name", "email"]);
        assert_eq!(errors.first().missing_property.as_deref(), Some("name"));
    }

    #[test]
    fn test_serialize_as_list() {
        let errors = SchemaErrors::single(
            missing(JsonPath::root(), "name").with_schema_path("/required"),
        );
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "instancePath": "",
                "keyword": "required",
                "message": "\"name\" is a required property",
                "schemaPath": "/required",
                "missingProperty": "name"
            }])
        );
    }
}
