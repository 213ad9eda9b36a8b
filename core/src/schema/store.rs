#![deny(missing_docs)]

//! # Schema Store
//!
//! Holds one or more named schema documents for the lifetime of a validator
//! and resolves `document#fragment` pointers to concrete schema nodes. No
//! network access is performed; every reference must name a registered
//! document.

use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

/// Scheme used to synthesize canonical URIs for documents registered under
/// bare names or filesystem paths.
const CANONICAL_PREFIX: &str = "oasguard://documents/";

/// Characters that must be percent-encoded when a document id or pointer
/// fragment is embedded in a `$ref` URI. Path templates routinely contain
/// `{` and `}`, which are not valid URI characters.
pub(crate) const URI_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%')
    .add(b'^')
    .add(b'|')
    .add(b'\\')
    .add(b'#')
    .add(b'?');

/// Registry of converted schema documents keyed by source identifier.
#[derive(Debug, Default)]
pub struct SchemaStore {
    documents: IndexMap<String, Value>,
}

impl SchemaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document under its source identifier, replacing any
    /// previous entry with the same id.
    pub fn add_schema(&mut self, id: impl Into<String>, document: Value) {
        self.documents.insert(id.into(), document);
    }

    /// Returns a registered document by id.
    pub fn get_schema(&self, id: &str) -> Option<&Value> {
        self.documents.get(id)
    }

    /// Iterates over registered `(id, document)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.documents.iter()
    }

    /// Canonical absolute URI for a document id.
    ///
    /// Ids that already carry a scheme are used as-is; bare names and
    /// filesystem paths are mounted under a private scheme so the engine's
    /// retriever sees a well-formed absolute URI.
    pub fn canonical_uri(&self, id: &str) -> String {
        if id.contains("://") {
            return id.to_string();
        }
        let mounted = id.trim_start_matches('/');
        format!(
            "{}{}",
            CANONICAL_PREFIX,
            utf8_percent_encode(mounted, URI_ESCAPES)
        )
    }

    /// Resolves a `document#fragment` pointer to a node in a stored
    /// document.
    ///
    /// The fragment is a JSON Pointer; a missing leading `/` is tolerated,
    /// so `doc#paths/...` and `doc#/paths/...` address the same node.
    pub fn resolve_ref(&self, pointer: &str) -> Option<&Value> {
        let (id, fragment) = pointer.split_once('#')?;
        let document = self.get_schema(id)?;
        resolve_fragment(document, fragment)
    }
}

/// Walks a JSON Pointer fragment through a document.
fn resolve_fragment<'a>(document: &'a Value, fragment: &str) -> Option<&'a Value> {
    let fragment = fragment.trim_start_matches('/');
    if fragment.is_empty() {
        return Some(document);
    }

    let mut node = document;
    for segment in fragment.split('/') {
        let key = decode_pointer_segment(segment);
        node = match node {
            Value::Object(map) => map.get(&key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}
