//! Tests for the schema engine resource.

use autopsy::{EngineError, SchemaEngine, SchemaId};
use jsonschema::Draft;
use serde_json::json;

#[test]
fn test_compile_and_get() {
    let engine = SchemaEngine::new();
    let id = SchemaId::generate("users");

    engine.compile(id.as_str(), &json!({"type": "object"})).unwrap();

    assert!(engine.get(id.as_str()).is_some());
    assert!(engine.get("urn:autopsy:schema:unknown").is_none());
}

#[test]
fn test_registry_is_append_only_until_reset() {
    let engine = SchemaEngine::new();
    let ids: Vec<SchemaId> = (0..5).map(|_| SchemaId::generate("same-locator")).collect();

    for id in &ids {
        engine.compile(id.as_str(), &json!({"type": "string"})).unwrap();
    }

    let expected: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();
    assert_eq!(engine.ids(), expected);
    assert_eq!(engine.len(), 5);

    engine.reset();
    assert!(engine.is_empty());
    assert!(engine.get(ids[0].as_str()).is_none());
}

#[test]
fn test_validator_survives_reset() {
    let engine = SchemaEngine::new();
    let validator = engine
        .compile("urn:test:survivor", &json!({"type": "integer"}))
        .unwrap();

    engine.reset();

    assert!(engine.check(&validator, &json!(1)).is_success());
    assert!(engine.check(&validator, &json!("one")).is_failure());
}

#[test]
fn test_compilation_error_names_schema() {
    let engine = SchemaEngine::new();
    let err = engine
        .compile("urn:test:broken", &json!({"minLength": "three"}))
        .unwrap_err();

    match &err {
        EngineError::SchemaCompilation { id, .. } => assert_eq!(id, "urn:test:broken"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().starts_with("schema 'urn:test:broken' failed to compile"));
}

#[test]
fn test_internal_refs_resolve_against_generated_id() {
    let engine = SchemaEngine::new();
    let id = SchemaId::for_locator("/users/{id}", "get", 200);
    let schema = json!({
        "$id": id.as_str(),
        "$ref": "#/definitions/User",
        "definitions": {
            "User": {"type": "object", "required": ["name"]}
        }
    });

    let validator = engine.compile(id.as_str(), &schema).unwrap();

    assert!(engine.check(&validator, &json!({"name": "a"})).is_success());
    assert!(engine.check(&validator, &json!({})).is_failure());
}

#[test]
fn test_uuid_and_date_time_formats() {
    let engine = SchemaEngine::new();
    let validator = engine
        .compile(
            "urn:test:formats",
            &json!({
                "type": "object",
                "properties": {
                    "id": {"type": "string", "format": "uuid"},
                    "at": {"type": "string", "format": "date-time"}
                }
            }),
        )
        .unwrap();

    let good = json!({"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "at": "2024-01-01T00:00:00Z"});
    let bad = json!({"id": "nope", "at": "yesterday"});

    assert!(engine.check(&validator, &good).is_success());
    assert!(engine.check(&validator, &bad).is_failure());
}

#[test]
fn test_forced_draft() {
    let engine = SchemaEngine::new().with_draft(Draft::Draft7);
    assert_eq!(engine.options().draft, Some(Draft::Draft7));

    let validator = engine
        .compile("urn:test:draft7", &json!({"type": "array", "items": {"type": "integer"}}))
        .unwrap();
    assert!(engine.check(&validator, &json!([1, 2])).is_success());
}
