#![deny(missing_docs)]

//! # oasguard-core
//!
//! Validates live HTTP request and response bodies against an OpenAPI v3
//! contract, for contract and integration testing.
//!
//! Given a contract document, a message body, and the logical route (path
//! template, method, status code, content type), the validator resolves the
//! exact schema fragment the contract assigns to that combination, walking
//! `paths`, method, `responses`/`requestBody` and content type while
//! confirming existence at each level, then validates the body against the
//! fragment with a JSON Schema engine.
//!
//! Failures fall into two categories callers should treat differently:
//! routing mismatches (`PathNotFound`, `MethodNotFound`,
//! `StatusCodeNotFound`, `ContentTypeNotFound`: the combination is not
//! declared, usually a test misconfiguration) and conformance mismatches
//! (`InvalidRequest`, `InvalidResponse`: the combination is declared but
//! the body violates its schema).
//!
//! ```no_run
//! use oasguard_core::OpenApiValidator;
//!
//! # fn main() -> oasguard_core::ValidatorResult<()> {
//! let validator = OpenApiValidator::from_file("openapi.yaml")?;
//! validator.validate_request(r#"{"id": 1}"#, "/orders", "POST")?;
//! validator.validate_response(r#"{"id": 1}"#, "/orders", "GET", 200)?;
//! # Ok(())
//! # }
//! ```

/// Shared error types.
pub mod error;

/// Request/response body access.
pub mod message;

/// OpenAPI document parsing and conversion.
pub mod oas;

/// Route resolution and schema pointers.
pub mod resolve;

/// Schema storage and the validation engine.
pub mod schema;

/// The public validator surface.
pub mod validator;

pub use error::{ConformanceError, ValidatorError, ValidatorResult, Violation};
pub use message::MessageBody;
pub use oas::convert::convert_document;
pub use oas::document::{parse_contract, Document};
pub use resolve::SchemaPointer;
pub use schema::engine::SchemaEngine;
pub use schema::store::SchemaStore;
pub use validator::{OpenApiValidator, APPLICATION_JSON};
