//! Integration tests for JsonPath.

use autopsy::{JsonPath, PathSegment};
use serde_json::json;

#[test]
fn test_path_construction_and_display() {
    assert_eq!(JsonPath::root().to_string(), "");
    assert_eq!(JsonPath::root().push_field("name").to_string(), "name");
    assert_eq!(JsonPath::root().push_index(0).to_string(), "[0]");

    let path = JsonPath::root()
        .push_field("users")
        .push_index(0)
        .push_field("address")
        .push_field("city");
    assert_eq!(path.to_string(), "users[0].address.city");
}

#[test]
fn test_pointer_segments_follow_data_shape() {
    let data = json!({"matrix": [[1, 2], [3, 4]], "byCode": {"404": "missing"}});

    let path = JsonPath::from_pointer("/matrix/1/0", &data);
    let segments: Vec<&PathSegment> = path.segments().collect();
    assert_eq!(
        segments,
        vec![
            &PathSegment::field("matrix"),
            &PathSegment::index(1),
            &PathSegment::index(0)
        ]
    );
    assert_eq!(path.get(&data), Some(&json!(3)));

    let path = JsonPath::from_pointer("/byCode/404", &data);
    assert_eq!(path.last(), Some(&PathSegment::field("404")));
    assert_eq!(path.get(&data), Some(&json!("missing")));
}

#[test]
fn test_pointer_past_end_of_data_uses_fields() {
    let data = json!({"a": {}});
    let path = JsonPath::from_pointer("/a/b/0", &data);

    assert_eq!(path.to_string(), "a.b.0");
    assert_eq!(path.get(&data), None);
}

#[test]
fn test_endpoint_with_slashes_is_single_segment() {
    let doc = json!({"paths": {"/users/{id}": {"get": {"ok": true}}}});
    let path = JsonPath::from_fields(["paths", "/users/{id}", "get", "ok"]);

    assert_eq!(path.len(), 4);
    assert_eq!(path.get(&doc), Some(&json!(true)));
}

#[test]
fn test_set_through_missing_containers() {
    let mut data = json!({"keep": 1});
    let path = JsonPath::root()
        .push_field("profile")
        .push_field("contact")
        .push_field("email");

    assert!(path.set(&mut data, json!("flagged")));
    assert_eq!(
        data,
        json!({"keep": 1, "profile": {"contact": {"email": "flagged"}}})
    );
}

#[test]
fn test_set_pads_arrays() {
    let mut data = json!({"items": [1]});
    let path = JsonPath::root().push_field("items").push_index(3);

    assert!(path.set(&mut data, json!(4)));
    assert_eq!(data, json!({"items": [1, null, null, 4]}));
}

#[test]
fn test_join_and_parent() {
    let base = JsonPath::from_fields(["paths", "/users"]);
    let tail = JsonPath::from_fields(["get", "responses"]);
    let joined = base.join(&tail);

    assert_eq!(joined.to_string(), "paths./users.get.responses");
    assert_eq!(joined.parent().unwrap().to_string(), "paths./users.get");
}

#[test]
fn test_path_hash() {
    use std::collections::HashSet;

    let mut set = HashSet::new();
    set.insert(JsonPath::root().push_field("a"));
    set.insert(JsonPath::root().push_field("b"));
    set.insert(JsonPath::root().push_field("a"));

    assert_eq!(set.len(), 2);
}
