#![deny(missing_docs)]

//! # Contract Validator
//!
//! The public entry point. Given a message body and its logical route (path
//! template, method, status code, content type), resolves the exact schema
//! fragment the contract assigns to that combination and validates the body
//! against it.
//!
//! Resolution runs against the raw document's routing index; validation runs
//! against the converted document held by the schema store. Both share one
//! tree shape, so the pointer built from the former addresses the latter.

use crate::error::{ConformanceError, ValidatorError, ValidatorResult, Violation};
use crate::message::MessageBody;
use crate::oas::convert::convert_document;
use crate::oas::document::{parse_contract, Document};
use crate::resolve::{Resolution, SchemaPointer};
use crate::schema::engine::SchemaEngine;
use crate::schema::store::SchemaStore;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Content type assumed when none is given.
pub const APPLICATION_JSON: &str = "application/json";

/// Status code defined to carry no body; such responses always pass.
const NO_CONTENT: u16 = 204;

/// Validates HTTP request and response bodies against an OpenAPI v3
/// contract.
///
/// The contract is loaded, indexed and converted once at construction; the
/// converted document is held by the schema store for the validator's
/// lifetime. All validation methods take `&self` and keep per-call
/// resolution state on the stack, so one instance may be shared across
/// threads and calls never leak state into each other.
#[derive(Debug)]
pub struct OpenApiValidator {
    document_id: String,
    document: Document,
    store: SchemaStore,
    engine: SchemaEngine,
}

impl OpenApiValidator {
    /// Loads a contract from a YAML or JSON file.
    ///
    /// The file path becomes the document identifier rendered in schema
    /// pointers.
    pub fn from_file(path: impl AsRef<Path>) -> ValidatorResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_document(path.display().to_string(), &text)
    }

    /// Builds a validator from contract text already in memory.
    pub fn from_document(document_id: impl Into<String>, text: &str) -> ValidatorResult<Self> {
        let document_id = document_id.into();
        let (raw, document) = parse_contract(text)?;

        let mut store = SchemaStore::new();
        store.add_schema(document_id.clone(), convert_document(&raw));

        Ok(Self {
            document_id,
            document,
            store,
            engine: SchemaEngine::default(),
        })
    }

    /// Validates a request body against the contract, assuming
    /// `application/json`.
    ///
    /// See [`validate_request_with`](Self::validate_request_with).
    pub fn validate_request<B>(
        &self,
        request: &B,
        path_name: &str,
        method: &str,
    ) -> ValidatorResult<()>
    where
        B: MessageBody + ?Sized,
    {
        self.validate_request_with(request, path_name, method, APPLICATION_JSON)
    }

    /// Validates a request body declared with an explicit content type.
    ///
    /// Resolution confirms path → method → content type in order and reports
    /// the earliest missing level. `path_name` may carry a query string,
    /// which is ignored; it must otherwise equal the literal template key in
    /// the contract.
    pub fn validate_request_with<B>(
        &self,
        request: &B,
        path_name: &str,
        method: &str,
        content_type: &str,
    ) -> ValidatorResult<()>
    where
        B: MessageBody + ?Sized,
    {
        let pointer = Resolution::request(&self.document, &self.document_id)
            .path(path_name)?
            .method(method)?
            .content_type(content_type)?;

        let body = self.parse_body(request)?;
        let violations = self.engine.validate(&self.store, &body, &pointer)?;
        if violations.is_empty() {
            return Ok(());
        }
        Err(ValidatorError::InvalidRequest(self.conformance_error(
            body,
            &pointer,
            violations,
        )?))
    }

    /// Validates a response body against the contract, assuming
    /// `application/json`.
    ///
    /// See [`validate_response_with`](Self::validate_response_with).
    pub fn validate_response<B>(
        &self,
        response: &B,
        path_name: &str,
        method: &str,
        status: u16,
    ) -> ValidatorResult<()>
    where
        B: MessageBody + ?Sized,
    {
        self.validate_response_with(response, path_name, method, status, APPLICATION_JSON)
    }

    /// Validates a response body declared with an explicit content type.
    ///
    /// A 204 response is defined to carry no body and passes immediately:
    /// resolution does not run and the body is never read, regardless of
    /// what the contract declares for 204. For every other status,
    /// resolution confirms path → method → status → content type in order
    /// and reports the earliest missing level.
    pub fn validate_response_with<B>(
        &self,
        response: &B,
        path_name: &str,
        method: &str,
        status: u16,
        content_type: &str,
    ) -> ValidatorResult<()>
    where
        B: MessageBody + ?Sized,
    {
        if status == NO_CONTENT {
            return Ok(());
        }

        let pointer = Resolution::response(&self.document, &self.document_id)
            .path(path_name)?
            .method(method)?
            .status(status)?
            .content_type(content_type)?;

        let body = self.parse_body(response)?;
        let violations = self.engine.validate(&self.store, &body, &pointer)?;
        if violations.is_empty() {
            return Ok(());
        }
        Err(ValidatorError::InvalidResponse(self.conformance_error(
            body,
            &pointer,
            violations,
        )?))
    }

    /// The identifier schema pointers are rendered under.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Read access to the converted document and `$ref` resolution.
    pub fn schema_store(&self) -> &SchemaStore {
        &self.store
    }

    fn parse_body<B>(&self, message: &B) -> ValidatorResult<Value>
    where
        B: MessageBody + ?Sized,
    {
        serde_json::from_slice(message.body_bytes().as_ref()).map_err(|e| {
            ValidatorError::MalformedBody {
                reason: e.to_string(),
            }
        })
    }

    /// Assembles the conformance payload: the parsed body, the schema node
    /// the pointer resolves to, and the engine's violations.
    fn conformance_error(
        &self,
        body: Value,
        pointer: &SchemaPointer,
        violations: Vec<Violation>,
    ) -> ValidatorResult<ConformanceError> {
        let schema = self
            .store
            .resolve_ref(&pointer.to_string())
            .cloned()
            .ok_or_else(|| ValidatorError::UnresolvableSchema {
                pointer: pointer.to_string(),
            })?;
        Ok(ConformanceError {
            body,
            schema,
            violations,
        })
    }
}
