#![deny(missing_docs)]

//! # OpenAPI to JSON Schema Conversion
//!
//! One-shot transform of an OpenAPI v3 document into a document the JSON
//! Schema engine (Draft 2020-12) can evaluate. The tree shape is preserved
//! exactly, so any JSON Pointer into the raw document addresses the same
//! node in the converted document.
//!
//! The rewrites are intentionally conservative and only touch keywords with
//! known draft gaps:
//! - `nullable: true` / `x-nullable: true` becomes a `type` union with
//!   `"null"`, or an `anyOf` wrapper when the schema declares no `type`.
//! - OAS 3.0 boolean `exclusiveMinimum`/`exclusiveMaximum` becomes the
//!   numeric Draft 2020-12 form.
//!
//! Walkers skip `example`, `examples`, `default` and `enum` containers so
//! payload data that happens to contain these keywords is left alone.

use serde_json::{json, Map, Value};

/// Keys whose values are payload data rather than schema, never rewritten.
fn is_payload_container(key: &str) -> bool {
    matches!(key, "example" | "examples" | "default" | "enum")
}

/// Converts an OpenAPI v3 document into its JSON-Schema-compatible
/// counterpart. Called exactly once per validator, at construction.
pub fn convert_document(raw: &Value) -> Value {
    let mut converted = raw.clone();
    rewrite_nullable(&mut converted);
    rewrite_exclusive_bounds(&mut converted);
    converted
}

/// Rewrites `nullable` / `x-nullable` flags into JSON Schema null unions.
fn rewrite_nullable(value: &mut Value) {
    if let Value::Object(map) = value {
        if let Some(replacement) = apply_nullable_flag(map) {
            *value = replacement;
        }
    }

    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if is_payload_container(key) {
                    continue;
                }
                rewrite_nullable(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                rewrite_nullable(v);
            }
        }
        _ => {}
    }
}

/// Applies one schema node's nullable flag.
///
/// Returns a replacement node when the schema has to be wrapped in `anyOf`
/// (no explicit `type` to extend); otherwise mutates in place and returns
/// `None`.
fn apply_nullable_flag(map: &mut Map<String, Value>) -> Option<Value> {
    let nullable = map
        .get("nullable")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
        || map
            .get("x-nullable")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

    if !nullable {
        // Only strip genuine flags; a key named `nullable` holding anything
        // but a boolean belongs to the document, not to this rewrite.
        if map.get("nullable").is_some_and(Value::is_boolean) {
            map.remove("nullable");
        }
        if map.get("x-nullable").is_some_and(Value::is_boolean) {
            map.remove("x-nullable");
        }
        return None;
    }

    map.remove("nullable");
    map.remove("x-nullable");

    if let Some(type_val) = map.get_mut("type") {
        match type_val {
            Value::String(s) => {
                if s != "null" {
                    *type_val = Value::Array(vec![
                        Value::String(s.clone()),
                        Value::String("null".to_string()),
                    ]);
                }
            }
            Value::Array(arr) => {
                let has_null = arr.iter().any(|v| v.as_str() == Some("null"));
                if !has_null {
                    arr.push(Value::String("null".to_string()));
                }
            }
            _ => {}
        }
        return None;
    }

    let original = Value::Object(map.clone());
    Some(json!({ "anyOf": [original, { "type": "null" }] }))
}

/// Rewrites OAS 3.0 boolean exclusive bounds into numeric Draft 2020-12 form.
fn rewrite_exclusive_bounds(value: &mut Value) {
    match value {
        Value::Object(map) => {
            rewrite_bound(map, "exclusiveMinimum", "minimum");
            rewrite_bound(map, "exclusiveMaximum", "maximum");
            for (key, v) in map.iter_mut() {
                if is_payload_container(key) {
                    continue;
                }
                rewrite_exclusive_bounds(v);
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                rewrite_exclusive_bounds(v);
            }
        }
        _ => {}
    }
}

fn rewrite_bound(map: &mut Map<String, Value>, exclusive: &str, inclusive: &str) {
    match map.get(exclusive) {
        Some(Value::Bool(true)) => {
            // `exclusiveMinimum: true` qualifies the inclusive bound; the
            // numeric form replaces both.
            map.remove(exclusive);
            if let Some(bound) = map.remove(inclusive) {
                map.insert(exclusive.to_string(), bound);
            }
        }
        Some(Value::Bool(false)) => {
            map.remove(exclusive);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_nullable_with_scalar_type() {
        let raw = json!({"type": "string", "nullable": true});
        let converted = convert_document(&raw);
        assert_eq!(converted, json!({"type": ["string", "null"]}));
    }

    #[test]
    fn test_nullable_with_type_array_already_null() {
        let raw = json!({"type": ["string", "null"], "nullable": true});
        let converted = convert_document(&raw);
        assert_eq!(converted, json!({"type": ["string", "null"]}));
    }

    #[test]
    fn test_nullable_without_type_wraps_in_any_of() {
        let raw = json!({"nullable": true, "format": "uuid"});
        let converted = convert_document(&raw);
        assert_eq!(
            converted,
            json!({"anyOf": [{"format": "uuid"}, {"type": "null"}]})
        );
    }

    #[test]
    fn test_x_nullable_is_honored() {
        let raw = json!({"type": "integer", "x-nullable": true});
        let converted = convert_document(&raw);
        assert_eq!(converted, json!({"type": ["integer", "null"]}));
    }

    #[test]
    fn test_nullable_false_is_stripped() {
        let raw = json!({"type": "string", "nullable": false});
        let converted = convert_document(&raw);
        assert_eq!(converted, json!({"type": "string"}));
    }

    #[test]
    fn test_example_payloads_are_untouched() {
        let raw = json!({
            "type": "object",
            "example": {"nullable": true, "exclusiveMinimum": true}
        });
        let converted = convert_document(&raw);
        assert_eq!(converted, raw);
    }

    #[test]
    fn test_boolean_exclusive_minimum_becomes_numeric() {
        let raw = json!({"type": "number", "minimum": 5, "exclusiveMinimum": true});
        let converted = convert_document(&raw);
        assert_eq!(
            converted,
            json!({"type": "number", "exclusiveMinimum": 5})
        );
    }

    #[test]
    fn test_boolean_exclusive_maximum_false_is_dropped() {
        let raw = json!({"type": "number", "maximum": 9, "exclusiveMaximum": false});
        let converted = convert_document(&raw);
        assert_eq!(converted, json!({"type": "number", "maximum": 9}));
    }

    #[test]
    fn test_numeric_exclusive_bounds_pass_through() {
        let raw = json!({"type": "number", "exclusiveMinimum": 2});
        let converted = convert_document(&raw);
        assert_eq!(converted, raw);
    }

    #[test]
    fn test_tree_shape_is_preserved() {
        let raw = json!({
            "openapi": "3.0.0",
            "paths": {
                "/orders": {
                    "post": {
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"type": "string", "nullable": true}
                                }
                            }
                        }
                    }
                }
            }
        });
        let converted = convert_document(&raw);
        let node = converted
            .pointer("/paths/~1orders/post/requestBody/content/application~1json/schema")
            .unwrap();
        assert_eq!(node, &json!({"type": ["string", "null"]}));
    }
}
