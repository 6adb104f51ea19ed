//! Schema resolution inside API description documents.
//!
//! [`resolve`] turns a Swagger 2 or OpenAPI 3 document plus a
//! [`PathLocator`] into one self-contained schema the engine can compile:
//! the response schema body, a fresh `$id`, and the document's shared
//! definitions so internal `$ref`s keep resolving.

use serde_json::{Map, Value};

use crate::document::{PathLocator, SchemaDocument};
use crate::id::SchemaId;
use crate::path::JsonPath;

/// Status key used when the requested status has no response entry.
pub const DEFAULT_RESPONSE: &str = "default";

/// A schema extracted from an API description document.
///
/// Built fresh for every request and never reused: the id is unique per
/// call, so two resolutions of the same locator compile independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSchema {
    id: SchemaId,
    schema: Value,
}

impl ResolvedSchema {
    /// Returns the generated id, which is also the schema's `$id`.
    pub fn id(&self) -> &SchemaId {
        &self.id
    }

    /// Returns the compilable schema.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Consumes self and returns the compilable schema.
    pub fn into_schema(self) -> Value {
        self.schema
    }
}

/// Extracts the schema `locator` points at from `document`.
///
/// Lookup goes through `paths.<endpoint>.<method>.responses.<status>`,
/// falling back to `responses.default` only when the status entry is absent
/// (an explicit `null` or `{}` entry does not fall back). The method is
/// matched case-insensitively; the endpoint must match exactly.
///
/// # Errors
///
/// - `ResolveError::InvalidPathParameters` if endpoint, method or status is missing.
/// - `ResolveError::NotAnApiDocument` if `document` is a plain schema.
/// - `ResolveError::ResponseDefinitionNotFound` if neither response entry exists.
/// - `ResolveError::SchemaDefinitionNotFound` if the response has no schema body.
///
/// # Example
///
/// ```rust
/// use autopsy::{resolve, PathLocator, SchemaDocument};
/// use serde_json::json;
///
/// let doc = json!({
///     "swagger": "2.0",
///     "paths": {"/pets": {"get": {"responses": {
///         "200": {"schema": {"$ref": "#/definitions/Pet"}}
///     }}}},
///     "definitions": {"Pet": {"type": "object"}}
/// });
///
/// let resolved = resolve(
///     SchemaDocument::classify(&doc),
///     &PathLocator::new("/pets", "GET", 200),
/// ).unwrap();
///
/// assert_eq!(resolved.schema()["$ref"], "#/definitions/Pet");
/// assert_eq!(resolved.schema()["definitions"]["Pet"]["type"], "object");
/// assert_eq!(resolved.schema()["$id"], resolved.id().as_str());
/// ```
pub fn resolve(
    document: SchemaDocument<'_>,
    locator: &PathLocator,
) -> Result<ResolvedSchema, ResolveError> {
    let endpoint = locator
        .endpoint
        .as_deref()
        .ok_or(ResolveError::InvalidPathParameters("endpoint"))?;
    let method = locator
        .method
        .as_deref()
        .ok_or(ResolveError::InvalidPathParameters("method"))?
        .to_lowercase();
    let status = locator
        .status
        .ok_or(ResolveError::InvalidPathParameters("status"))?;

    let (schema_path, registry_key) = document
        .response_schema_path()
        .zip(document.registry_key())
        .ok_or(ResolveError::NotAnApiDocument)?;
    let root = document.value();

    let id = SchemaId::for_locator(endpoint, &method, status);

    let responses = JsonPath::from_fields(["paths", endpoint, method.as_str(), "responses"]);
    let status_path = responses.push_field(status.to_string());
    let default_path = responses.push_field(DEFAULT_RESPONSE);

    let (response_path, response) = match status_path.get(root) {
        Some(response) => (status_path, response),
        None => match default_path.get(root) {
            Some(response) => {
                tracing::debug!(%endpoint, %method, status, "falling back to default response");
                (default_path, response)
            }
            None => {
                return Err(ResolveError::ResponseDefinitionNotFound {
                    status_path: status_path.to_string(),
                    default_path: default_path.to_string(),
                })
            }
        },
    };

    let body = match schema_path.get(response) {
        Some(body) if !body.is_null() => body,
        _ => {
            return Err(ResolveError::SchemaDefinitionNotFound(
                response_path.join(&schema_path).to_string(),
            ))
        }
    };

    let mut schema = Map::new();
    schema.insert("$id".to_string(), Value::String(id.as_str().to_string()));
    match body {
        Value::Object(fields) => {
            for (key, value) in fields {
                if key != "$id" && key != registry_key {
                    schema.insert(key.clone(), value.clone());
                }
            }
        }
        // Boolean schemas have no fields; `true` accepts, `false` rejects.
        Value::Bool(false) => {
            schema.insert("not".to_string(), Value::Object(Map::new()));
        }
        _ => {}
    }
    if let Some(registry) = root.get(registry_key) {
        schema.insert(registry_key.to_string(), registry.clone());
    }

    tracing::debug!(
        schema_id = %id,
        kind = %document.kind(),
        response = %response_path,
        "resolved response schema"
    );

    Ok(ResolvedSchema {
        id,
        schema: Value::Object(schema),
    })
}

/// Errors that can occur while locating a schema in a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A locator field needed for document lookup is absent.
    #[error("invalid path parameters: '{0}' is required to locate a schema in an API document")]
    InvalidPathParameters(&'static str),

    /// The document carries neither a `swagger` nor an `openapi` marker.
    #[error("schema is not a swagger or openapi document")]
    NotAnApiDocument,

    /// Neither the status nor the default response exists.
    #[error("response definition not found at '{status_path}' or '{default_path}'")]
    ResponseDefinitionNotFound {
        /// Lookup path for the requested status.
        status_path: String,
        /// Lookup path for the default response.
        default_path: String,
    },

    /// The response exists but carries no schema body.
    #[error("schema definition not found at '{0}'")]
    SchemaDefinitionNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn openapi() -> Value {
        json!({
            "openapi": "3.0.0",
            "paths": {
                "/users": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/User"}
                                    }
                                }
                            },
                            "204": {},
                            "default": {
                                "content": {
                                    "application/json": {"schema": {"type": "object"}}
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "properties": {"name": {"type": "string"}},
                        "required": ["name"]
                    }
                }
            }
        })
    }

    #[test]
    fn test_resolves_openapi_and_carries_components() {
        let doc = openapi();
        let resolved = resolve(
            SchemaDocument::classify(&doc),
            &PathLocator::new("/users", "GET", 200),
        )
        .unwrap();

        let schema = resolved.schema();
        assert_eq!(schema["$ref"], "#/components/schemas/User");
        assert_eq!(schema["components"], doc["components"]);
        assert_eq!(schema["$id"], resolved.id().as_str());
        assert_eq!(resolved.id().label(), "/users:get:200");
    }

    #[test]
    fn test_missing_status_falls_back_to_default() {
        let doc = openapi();
        let resolved = resolve(
            SchemaDocument::classify(&doc),
            &PathLocator::new("/users", "get", 500),
        )
        .unwrap();

        assert_eq!(resolved.schema()["type"], "object");
    }

    #[test]
    fn test_empty_status_entry_does_not_fall_back() {
        let doc = openapi();
        let err = resolve(
            SchemaDocument::classify(&doc),
            &PathLocator::new("/users", "get", 204),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ResolveError::SchemaDefinitionNotFound(
                "paths./users.get.responses.204.content.application/json.schema".to_string()
            )
        );
    }

    #[test]
    fn test_unknown_endpoint_names_both_paths() {
        let doc = openapi();
        let err = resolve(
            SchemaDocument::classify(&doc),
            &PathLocator::new("/orders", "get", 200),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ResolveError::ResponseDefinitionNotFound {
                status_path: "paths./orders.get.responses.200".to_string(),
                default_path: "paths./orders.get.responses.default".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_locator_fields() {
        let doc = openapi();
        let document = SchemaDocument::classify(&doc);

        let err = resolve(document, &PathLocator::default()).unwrap_err();
        assert_eq!(err, ResolveError::InvalidPathParameters("endpoint"));

        let err = resolve(document, &PathLocator::endpoint("/users").with_method("get")).unwrap_err();
        assert_eq!(err, ResolveError::InvalidPathParameters("status"));
    }

    #[test]
    fn test_plain_schema_cannot_be_resolved() {
        let schema = json!({"type": "object"});
        let err = resolve(
            SchemaDocument::classify(&schema),
            &PathLocator::new("/users", "get", 200),
        )
        .unwrap_err();

        assert_eq!(err, ResolveError::NotAnApiDocument);
    }

    #[test]
    fn test_generated_id_and_registry_win_over_body_fields() {
        let doc = json!({
            "swagger": "2.0",
            "paths": {"/a": {"get": {"responses": {"200": {"schema": {
                "$id": "urn:body",
                "definitions": {"Shadow": {}},
                "type": "string"
            }}}}}},
            "definitions": {"Real": {"type": "integer"}}
        });
        let resolved = resolve(
            SchemaDocument::classify(&doc),
            &PathLocator::new("/a", "GET", 200),
        )
        .unwrap();

        assert_eq!(resolved.schema()["$id"], resolved.id().as_str());
        assert_eq!(resolved.schema()["definitions"], json!({"Real": {"type": "integer"}}));
        assert_eq!(resolved.schema()["type"], "string");
    }

    #[test]
    fn test_repeated_resolution_yields_fresh_ids() {
        let doc = openapi();
        let locator = PathLocator::new("/users", "get", 200);
        let a = resolve(SchemaDocument::classify(&doc), &locator).unwrap();
        let b = resolve(SchemaDocument::classify(&doc), &locator).unwrap();

        assert_ne!(a.id(), b.id());
    }
}
