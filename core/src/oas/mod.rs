#![deny(missing_docs)]

//! # OpenAPI Document Handling
//!
//! Parsing of the raw contract into a typed routing index, and the one-shot
//! conversion of the contract into its JSON-Schema-compatible counterpart.

/// Contract parsing and the typed routing index.
pub mod document;

/// OpenAPI v3 to JSON Schema conversion.
pub mod convert;
