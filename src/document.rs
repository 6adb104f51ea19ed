//! API description documents and schema locators.
//!
//! A schema handed to the inspector is one of three things: a plain JSON
//! Schema, a Swagger 2 document or an OpenAPI 3 document. [`SchemaDocument`]
//! classifies a value once, at the boundary, by its version marker.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::JsonPath;

/// Version marker of a Swagger 2 document.
pub const SWAGGER_MARKER: &str = "swagger";
/// Version marker of an OpenAPI 3 document.
pub const OPENAPI_MARKER: &str = "openapi";

/// Media type whose schema OpenAPI responses are validated against.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A schema, or an API description document embedding many schemas.
///
/// # Example
///
/// ```rust
/// use autopsy::{DocumentKind, SchemaDocument};
/// use serde_json::json;
///
/// let doc = json!({"openapi": "3.0.0", "paths": {}});
/// assert_eq!(SchemaDocument::classify(&doc).kind(), DocumentKind::OpenApi);
///
/// let schema = json!({"type": "object"});
/// assert_eq!(SchemaDocument::classify(&schema).kind(), DocumentKind::Plain);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaDocument<'a> {
    /// A self-contained JSON Schema.
    Plain(&'a Value),
    /// A Swagger 2 document (`swagger` marker).
    Swagger(&'a Value),
    /// An OpenAPI 3 document (`openapi` marker).
    OpenApi(&'a Value),
}

/// The variant of a [`SchemaDocument`], without the borrowed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A self-contained JSON Schema.
    Plain,
    /// A Swagger 2 document.
    Swagger,
    /// An OpenAPI 3 document.
    OpenApi,
}

impl<'a> SchemaDocument<'a> {
    /// Classifies `value` by its version marker.
    ///
    /// Only the presence of `swagger` or `openapi` at the top level matters;
    /// schema keywords are never inspected. A document carrying both markers
    /// is treated as Swagger.
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key(SWAGGER_MARKER) => SchemaDocument::Swagger(value),
            Value::Object(map) if map.contains_key(OPENAPI_MARKER) => SchemaDocument::OpenApi(value),
            _ => SchemaDocument::Plain(value),
        }
    }

    /// Returns the variant.
    pub fn kind(&self) -> DocumentKind {
        match self {
            SchemaDocument::Plain(_) => DocumentKind::Plain,
            SchemaDocument::Swagger(_) => DocumentKind::Swagger,
            SchemaDocument::OpenApi(_) => DocumentKind::OpenApi,
        }
    }

    /// Returns the underlying value.
    pub fn value(&self) -> &'a Value {
        match *self {
            SchemaDocument::Plain(v) | SchemaDocument::Swagger(v) | SchemaDocument::OpenApi(v) => v,
        }
    }

    /// Returns true for Swagger and OpenAPI documents.
    pub fn is_api_document(&self) -> bool {
        !matches!(self, SchemaDocument::Plain(_))
    }

    /// Path from a response object to its schema body, or `None` for a
    /// plain schema.
    pub fn response_schema_path(&self) -> Option<JsonPath> {
        match self {
            SchemaDocument::Plain(_) => None,
            SchemaDocument::Swagger(_) => Some(JsonPath::from_field("schema")),
            SchemaDocument::OpenApi(_) => {
                Some(JsonPath::from_fields(["content", JSON_MEDIA_TYPE, "schema"]))
            }
        }
    }

    /// Top-level key holding the shared definitions, or `None` for a plain
    /// schema.
    pub fn registry_key(&self) -> Option<&'static str> {
        match self {
            SchemaDocument::Plain(_) => None,
            SchemaDocument::Swagger(_) => Some("definitions"),
            SchemaDocument::OpenApi(_) => Some("components"),
        }
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Plain => write!(f, "plain schema"),
            DocumentKind::Swagger => write!(f, "swagger"),
            DocumentKind::OpenApi => write!(f, "openapi"),
        }
    }
}

/// Errors raised while reading a YAML document.
#[cfg(feature = "yaml")]
#[derive(Debug, thiserror::Error)]
pub enum YamlError {
    /// The text is not valid YAML.
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A number has no JSON representation.
    #[error("unsupported YAML number: {0}")]
    UnsupportedNumber(String),

    /// A mapping key cannot become a JSON object key.
    #[error("unsupported YAML map key: {0:?}")]
    UnsupportedKey(serde_yaml::Value),
}

/// Parses a YAML document into a JSON value.
///
/// Integer response codes written unquoted in YAML (`200:`) become the
/// string keys `"200"`, matching what the same document looks like as JSON.
///
/// # Errors
///
/// Returns `YamlError` if the text does not parse, or if it holds a value
/// JSON cannot represent (`.nan`, `.inf`, sequence or mapping keys).
#[cfg(feature = "yaml")]
pub fn from_yaml_str(text: &str) -> Result<Value, YamlError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    yaml_to_json(yaml)
}

#[cfg(feature = "yaml")]
fn yaml_to_json(yaml: serde_yaml::Value) -> Result<Value, YamlError> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::from(u))
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| YamlError::UnsupportedNumber(n.to_string()))
            }
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Sequence(items) => items
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                object.insert(yaml_key(k)?, yaml_to_json(v)?);
            }
            Ok(Value::Object(object))
        }
        Yaml::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

#[cfg(feature = "yaml")]
fn yaml_key(key: serde_yaml::Value) -> Result<String, YamlError> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        other => Err(YamlError::UnsupportedKey(other)),
    }
}

/// Identifies one schema inside an API description document.
///
/// `method` and `status` default to `GET` and `200`; see
/// [`PathLocator::apply_defaults`].
///
/// # Example
///
/// ```rust
/// use autopsy::PathLocator;
///
/// let mut locator = PathLocator::endpoint("/users");
/// locator.apply_defaults();
///
/// assert_eq!(locator.method.as_deref(), Some("GET"));
/// assert_eq!(locator.status, Some(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathLocator {
    /// Endpoint path exactly as written in the document (`/users/{id}`).
    pub endpoint: Option<String>,
    /// HTTP method, case-insensitive.
    pub method: Option<String>,
    /// Expected response status code.
    pub status: Option<u16>,
}

impl PathLocator {
    /// Default method when none is given.
    pub const DEFAULT_METHOD: &'static str = "GET";
    /// Default status when none is given.
    pub const DEFAULT_STATUS: u16 = 200;

    /// Creates a fully specified locator.
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>, status: u16) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            method: Some(method.into()),
            status: Some(status),
        }
    }

    /// Creates a locator with only the endpoint set.
    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Sets the method and returns self for chaining.
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the status and returns self for chaining.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Fills in `GET` and `200` where method or status are absent.
    pub fn apply_defaults(&mut self) {
        self.method
            .get_or_insert_with(|| Self::DEFAULT_METHOD.to_string());
        self.status.get_or_insert(Self::DEFAULT_STATUS);
    }
}
