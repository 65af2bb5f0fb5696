//! Deterministic key ordering for exported documents.
//!
//! Mappings are rebuilt with their keys in ascending order; sequences keep their
//! element order. The document root and the `components` block instead follow a
//! fixed preference list, with any key not on the list appended alphabetically.

use crate::COMPONENTS_FIELD;
use crate::types::ComponentKind;
use serde_json::{Map, Value};

/// Preferred order of the document's top-level keys.
pub const ROOT_KEY_ORDER: [&str; 8] = [
    "openapi",
    "info",
    "servers",
    "paths",
    "components",
    "security",
    "tags",
    "externalDocs",
];

/// Recursively sorts every mapping's keys in ascending order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let sorted = keys
                .into_iter()
                .map(|key| (key.clone(), sort_keys(&map[key.as_str()])))
                .collect::<Map<String, Value>>();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        scalar => scalar.clone(),
    }
}

/// Orders `map` by `preferred` first, then the remaining keys alphabetically.
/// Every value is passed through `sort_child`.
fn order_with_preference<F>(map: &Map<String, Value>, preferred: &[&str], sort_child: F) -> Value
where
    F: Fn(&str, &Value) -> Value,
{
    let mut ordered = Map::new();
    for key in preferred {
        if let Some(child) = map.get(*key) {
            ordered.insert((*key).to_string(), sort_child(*key, child));
        }
    }

    let mut remaining: Vec<&String> = map
        .keys()
        .filter(|key| !preferred.contains(&key.as_str()))
        .collect();
    remaining.sort();
    for key in remaining {
        ordered.insert(key.clone(), sort_child(key.as_str(), &map[key.as_str()]));
    }
    Value::Object(ordered)
}

fn canonicalize_components(components: &Value) -> Value {
    match components {
        Value::Object(map) => {
            let preferred = ComponentKind::ALL.map(|kind| kind.as_str());
            order_with_preference(map, &preferred, |_, child| sort_keys(child))
        }
        other => sort_keys(other),
    }
}

/// Canonical form of a whole document. Never fails; a non-mapping root is
/// simply key-sorted.
pub fn canonicalize_document(document: &Value) -> Value {
    match document {
        Value::Object(map) => order_with_preference(map, &ROOT_KEY_ORDER, |key, child| {
            if key == COMPONENTS_FIELD {
                canonicalize_components(child)
            } else {
                sort_keys(child)
            }
        }),
        other => sort_keys(other),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn keys(value: &Value) -> Vec<&str> {
        value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_sort_keys_is_recursive() {
        let value = json!({ "b": { "z": 1, "a": 2 }, "a": [{ "y": 1, "x": 2 }] });
        let sorted = sort_keys(&value);
        assert_eq!(keys(&sorted), vec!["a", "b"]);
        assert_eq!(keys(&sorted["b"]), vec!["a", "z"]);
        assert_eq!(keys(&sorted["a"][0]), vec!["x", "y"]);
    }

    #[test]
    fn test_arrays_keep_order_and_scalars_pass_through() {
        assert_eq!(sort_keys(&json!([3, 1, 2])), json!([3, 1, 2]));
        assert_eq!(sort_keys(&json!("text")), json!("text"));
        assert_eq!(sort_keys(&json!(null)), json!(null));
    }

    #[test]
    fn test_root_follows_preferred_order() {
        let document = json!({
            "x-audience": "internal",
            "tags": [],
            "paths": {},
            "info": {},
            "components": {},
            "openapi": "3.1.1",
            "externalDocs": {},
            "servers": [],
            "security": [],
            "webhooks": {}
        });
        let canonical = canonicalize_document(&document);
        assert_eq!(
            keys(&canonical),
            vec![
                "openapi",
                "info",
                "servers",
                "paths",
                "components",
                "security",
                "tags",
                "externalDocs",
                "webhooks",
                "x-audience"
            ]
        );
    }

    #[test]
    fn test_components_follow_preferred_order() {
        let document = json!({
            "components": {
                "x-internal": {},
                "callbacks": {},
                "securitySchemes": { "b": {}, "a": {} },
                "schemas": { "User": { "type": "object" }, "Address": {} },
                "pathItems": {}
            }
        });
        let canonical = canonicalize_document(&document);
        let components = &canonical["components"];
        assert_eq!(
            keys(components),
            vec!["schemas", "securitySchemes", "callbacks", "pathItems", "x-internal"]
        );
        assert_eq!(keys(&components["schemas"]), vec!["Address", "User"]);
        assert_eq!(keys(&components["securitySchemes"]), vec!["a", "b"]);
    }

    #[test]
    fn test_paths_are_alphabetical() {
        let document = json!({
            "paths": { "/users": { "post": {}, "get": {} }, "/items": {} }
        });
        let canonical = canonicalize_document(&document);
        assert_eq!(keys(&canonical["paths"]), vec!["/items", "/users"]);
        assert_eq!(keys(&canonical["paths"]["/users"]), vec!["get", "post"]);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let first = json!({ "info": { "version": "1", "title": "A" }, "openapi": "3.1.0" });
        let second = json!({ "openapi": "3.1.0", "info": { "title": "A", "version": "1" } });
        assert_eq!(
            serde_json::to_string(&canonicalize_document(&first)).unwrap(),
            serde_json::to_string(&canonicalize_document(&second)).unwrap()
        );
    }

    #[test]
    fn test_non_mapping_root_is_sorted() {
        let value = json!([{ "b": 1, "a": 2 }]);
        assert_eq!(keys(&canonicalize_document(&value)[0]), vec!["a", "b"]);
    }
}
