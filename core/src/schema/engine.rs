#![deny(missing_docs)]

//! # Validation Engine
//!
//! Thin wrapper around the `jsonschema` crate (Draft 2020-12). Each call
//! compiles an entry schema of the form `{"$ref": <pointer>}` with a local
//! retriever serving the store's documents, so references resolve without
//! any network access, then maps the engine's error stream into the crate's
//! [`Violation`] type.

use crate::error::{ValidatorError, ValidatorResult, Violation};
use crate::resolve::SchemaPointer;
use crate::schema::store::{SchemaStore, URI_ESCAPES};
use jsonschema::{Retrieve, Uri, ValidationOptions};
use percent_encoding::utf8_percent_encode;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Local retriever that resolves `$ref` URIs to documents held by the store.
///
/// Every reference must resolve locally; unknown URIs are an error, never a
/// fetch.
struct StoreRetriever {
    /// Map from URI string to document value.
    documents_by_uri: HashMap<String, Value>,
}

impl Retrieve for StoreRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        // Direct lookup.
        if let Some(value) = self.documents_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        // Relative-path ids may reach us resolved against an unexpected
        // base; fall back to the bare filename.
        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.documents_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Err(format!("unknown schema document '{}'", uri_str).into())
    }
}

/// Compiles and runs schema validation against documents held by a
/// [`SchemaStore`].
#[derive(Debug, Default)]
pub struct SchemaEngine;

impl SchemaEngine {
    /// Validates `instance` against the schema fragment addressed by
    /// `pointer`.
    ///
    /// Returns the engine's violations; an empty list means the instance
    /// conforms. A pointer whose document or fragment cannot be resolved
    /// surfaces as [`ValidatorError::SchemaCompile`].
    pub fn validate(
        &self,
        store: &SchemaStore,
        instance: &Value,
        pointer: &SchemaPointer,
    ) -> ValidatorResult<Vec<Violation>> {
        let entry = json!({ "$ref": ref_uri(store, pointer) });

        let validator = self.build_options(store).build(&entry).map_err(|e| {
            ValidatorError::SchemaCompile {
                pointer: pointer.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(validator
            .iter_errors(instance)
            .map(|e| Violation {
                property: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect())
    }

    /// Builds validation options with every stored document registered under
    /// its canonical URI, raw id, and bare filename, plus the local
    /// retriever for anything the resolver normalizes differently.
    fn build_options(&self, store: &SchemaStore) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);

        let mut documents_by_uri = HashMap::new();
        for (id, value) in store.iter() {
            documents_by_uri.insert(store.canonical_uri(id), value.clone());
            documents_by_uri.insert(id.clone(), value.clone());
            if let Some(filename) = id.rsplit('/').next() {
                documents_by_uri.insert(filename.to_string(), value.clone());
            }
        }

        opts.with_retriever(StoreRetriever { documents_by_uri });
        opts
    }
}

/// Renders the absolute `$ref` URI for a schema pointer.
///
/// The human-readable pointer keeps raw template characters; the URI form
/// percent-encodes anything outside the URI character set (`{`, `}`, spaces)
/// so the engine's URI parser accepts it.
fn ref_uri(store: &SchemaStore, pointer: &SchemaPointer) -> String {
    format!(
        "{}#{}",
        store.canonical_uri(pointer.document()),
        utf8_percent_encode(pointer.fragment(), URI_ESCAPES)
    )
}
