//! End-to-end contract validation against an in-memory fixture document.

use oasguard_core::{OpenApiValidator, ValidatorError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

const CONTRACT: &str = r#"
openapi: 3.0.0
info:
  title: Orders API
  version: 1.0.0
paths:
  /orders:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              required: [id]
              properties:
                id:
                  type: integer
    get:
      responses:
        200:
          description: list
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Order'
            application/vnd.api+json:
              schema:
                type: object
  /orders/{id}:
    get:
      responses:
        "200":
          description: one order
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Order'
    delete:
      responses:
        "204":
          description: deleted
components:
  schemas:
    Order:
      type: object
      required: [id]
      properties:
        id:
          type: integer
        note:
          type: string
          nullable: true
"#;

fn validator() -> OpenApiValidator {
    OpenApiValidator::from_document("orders.yaml", CONTRACT).unwrap()
}

#[test]
fn valid_request_passes() {
    assert!(validator()
        .validate_request(r#"{"id": 1}"#, "/orders", "POST")
        .is_ok());
}

#[test]
fn invalid_request_reports_one_violation_on_id() {
    let err = validator()
        .validate_request(r#"{"id": "x"}"#, "/orders", "POST")
        .unwrap_err();
    match err {
        ValidatorError::InvalidRequest(failure) => {
            assert_eq!(failure.violations.len(), 1);
            assert_eq!(failure.violations[0].property, "/id");
            assert_eq!(failure.body, json!({"id": "x"}));
        }
        other => panic!("expected InvalidRequest, got {other}"),
    }
}

#[test]
fn query_string_resolves_like_the_bare_path() {
    let validator = validator();
    let with_query = validator.validate_request(r#"{"id": 1}"#, "/orders?active=true", "POST");
    let bare = validator.validate_request(r#"{"id": 1}"#, "/orders", "POST");
    assert!(with_query.is_ok());
    assert!(bare.is_ok());
}

#[test]
fn missing_path_is_a_routing_mismatch() {
    let err = validator()
        .validate_response("{}", "/missing-path", "GET", 200)
        .unwrap_err();
    assert!(matches!(err, ValidatorError::PathNotFound { ref path } if path == "/missing-path"));
    assert!(err.is_routing_mismatch());
    assert!(!err.is_conformance_mismatch());
}

#[test]
fn earliest_failing_stage_wins() {
    // PUT /orders is undeclared, and so would be the text/csv content type;
    // the method-level failure must be the one reported.
    let err = validator()
        .validate_response_with("{}", "/orders", "PUT", 200, "text/csv")
        .unwrap_err();
    assert!(matches!(err, ValidatorError::MethodNotFound { ref method, .. } if method == "put"));
}

#[test]
fn undeclared_status_code_is_reported() {
    let err = validator()
        .validate_response("{}", "/orders", "GET", 500)
        .unwrap_err();
    assert!(matches!(
        err,
        ValidatorError::StatusCodeNotFound {
            status: 500,
            ..
        }
    ));
}

#[test]
fn undeclared_content_type_is_reported_with_route() {
    let err = validator()
        .validate_response_with("{}", "/orders", "GET", 200, "text/csv")
        .unwrap_err();
    match err {
        ValidatorError::ContentTypeNotFound {
            content_type,
            status,
            method,
            path,
        } => {
            assert_eq!(content_type, "text/csv");
            assert_eq!(status, Some(200));
            assert_eq!(method, "get");
            assert_eq!(path, "/orders");
        }
        other => panic!("expected ContentTypeNotFound, got {other}"),
    }
}

#[test]
fn vendor_content_type_resolves() {
    assert!(validator()
        .validate_response_with(r#"{"any": "shape"}"#, "/orders", "GET", 200, "application/vnd.api+json")
        .is_ok());
}

#[test]
fn response_204_always_passes() {
    let validator = validator();
    assert!(validator
        .validate_response("<<not json>>", "/orders/{id}", "DELETE", 204)
        .is_ok());
    // Even for routes the contract does not declare at all.
    assert!(validator
        .validate_response("<<not json>>", "/nowhere", "BREW", 204)
        .is_ok());
}

#[test]
fn component_ref_and_nullable_survive_conversion() {
    let validator = validator();
    // `note` is nullable in OAS 3.0 syntax; after conversion null must pass.
    assert!(validator
        .validate_response(r#"{"id": 7, "note": null}"#, "/orders/{id}", "GET", 200)
        .is_ok());
    let err = validator
        .validate_response(r#"{"note": "no id"}"#, "/orders/{id}", "GET", 200)
        .unwrap_err();
    assert!(matches!(err, ValidatorError::InvalidResponse(_)));
}

#[test]
fn sequential_calls_do_not_leak_state() {
    let validator = validator();

    // Failure, then an unrelated success, then the same failure again: the
    // outcomes must be pairwise identical and mode must not bleed over.
    let first = validator.validate_request(r#"{"id": "x"}"#, "/orders", "POST");
    assert!(validator
        .validate_response(r#"[{"id": 1}]"#, "/orders", "GET", 200)
        .is_ok());
    let second = validator.validate_request(r#"{"id": "x"}"#, "/orders", "POST");

    match (first.unwrap_err(), second.unwrap_err()) {
        (ValidatorError::InvalidRequest(a), ValidatorError::InvalidRequest(b)) => {
            assert_eq!(a, b);
        }
        (a, b) => panic!("expected matching InvalidRequest errors, got {a} / {b}"),
    }
}

#[test]
fn round_trip_against_the_resolved_fragment() {
    let validator = validator();

    // The fragment the pointer addresses declares `required: [id]` with an
    // integer `id`; a body built to that shape must validate.
    let schema = validator
        .schema_store()
        .resolve_ref("orders.yaml#/paths/~1orders/post/requestBody/content/application~1json/schema")
        .unwrap();
    assert_eq!(schema["required"], json!(["id"]));
    assert_eq!(schema["properties"]["id"]["type"], json!("integer"));

    assert!(validator
        .validate_request(&json!({"id": 42}), "/orders", "POST")
        .is_ok());
}

#[test]
fn pointer_fragments_tolerate_the_slashless_form() {
    let validator = validator();
    let with_slash = validator
        .schema_store()
        .resolve_ref("orders.yaml#/components/schemas/Order");
    let without_slash = validator
        .schema_store()
        .resolve_ref("orders.yaml#components/schemas/Order");
    assert!(with_slash.is_some());
    assert_eq!(with_slash, without_slash);
}

#[test]
fn from_file_uses_the_path_as_document_id() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONTRACT.as_bytes()).unwrap();

    let validator = OpenApiValidator::from_file(file.path()).unwrap();
    assert_eq!(validator.document_id(), file.path().display().to_string());
    assert!(validator
        .validate_request(r#"{"id": 1}"#, "/orders", "POST")
        .is_ok());
}

#[test]
fn from_file_missing_document_is_io() {
    let err = OpenApiValidator::from_file("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, ValidatorError::Io(_)));
}
