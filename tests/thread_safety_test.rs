//! Tests for sharing an inspector and its engine across threads.

use autopsy::{Inspector, PathLocator};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_validation() {
    let inspector = Arc::new(Inspector::new());
    let schema = Arc::new(json!({
        "type": "object",
        "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
        "required": ["name", "age"]
    }));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let inspector = Arc::clone(&inspector);
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let outcome = inspector
                    .validate_schema(&json!({"name": format!("User{}", i)}), Some(schema.as_ref()), None, None)
                    .unwrap();
                assert_eq!(outcome.data_mismatches["age"], "⚠️ Missing property 'age'");
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(inspector.engine().len(), 10);
}

#[test]
fn test_concurrent_resolution_never_collides() {
    let inspector = Arc::new(Inspector::new());
    let doc = Arc::new(json!({
        "swagger": "2.0",
        "paths": {"/ping": {"get": {"responses": {"200": {"schema": {"type": "string"}}}}}}
    }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let inspector = Arc::clone(&inspector);
            let doc = Arc::clone(&doc);
            thread::spawn(move || {
                for _ in 0..5 {
                    let mut locator = PathLocator::endpoint("/ping");
                    let outcome = inspector
                        .validate_schema(&json!("pong"), Some(doc.as_ref()), Some(&mut locator), None)
                        .unwrap();
                    assert!(outcome.is_valid());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let ids: HashSet<String> = inspector.engine().ids().into_iter().collect();
    assert_eq!(ids.len(), 40);
}
