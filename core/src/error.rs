#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the `ValidatorError` enum used across the workspace.
//!
//! Two failure categories share the enum and callers are expected to treat
//! them differently: routing mismatches (the path/method/status/content-type
//! combination is not declared in the contract, usually a test
//! misconfiguration) and conformance mismatches (the combination is declared
//! but the message body does not satisfy its schema, a real contract
//! violation). [`ValidatorError::is_routing_mismatch`] and
//! [`ValidatorError::is_conformance_mismatch`] expose the split.

use serde_json::Value;
use std::fmt::{self, Display};
use std::io;

/// A single schema violation reported by the validation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the offending property in the message body.
    /// Empty for violations of the body root.
    pub property: String,
    /// JSON Pointer to the schema keyword that rejected the property.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.property, self.message)
        }
    }
}

/// Payload of a conformance failure: the route is declared in the contract,
/// but the message body does not satisfy the schema fragment assigned to it.
///
/// Carries everything needed to diagnose the failure without re-running
/// resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformanceError {
    /// The parsed message body that failed validation.
    pub body: Value,
    /// The resolved schema fragment the body was validated against.
    pub schema: Value,
    /// Individual violations reported by the engine.
    pub violations: Vec<Violation>,
}

impl Display for ConformanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        for violation in &self.violations {
            write!(f, "\n  {}", violation)?;
        }
        Ok(())
    }
}

/// The error enum for contract validation.
///
/// Resolution-stage variants name the exact routing level that is missing;
/// the earliest failing level wins and later levels are never probed.
#[derive(Debug)]
pub enum ValidatorError {
    /// The sanitized path template is not a key under the contract's `paths`.
    PathNotFound {
        /// The path template after query-string stripping.
        path: String,
    },

    /// The HTTP method is not declared under the resolved path.
    MethodNotFound {
        /// The lower-cased method.
        method: String,
        /// The resolved path template.
        path: String,
    },

    /// The status code is not declared under the resolved operation's
    /// `responses`.
    StatusCodeNotFound {
        /// The missing status code.
        status: u16,
        /// The resolved method.
        method: String,
        /// The resolved path template.
        path: String,
    },

    /// The content type is not declared under the resolved response or
    /// request body `content`.
    ContentTypeNotFound {
        /// The missing content type.
        content_type: String,
        /// The resolved status code; `None` for request-body validation.
        status: Option<u16>,
        /// The resolved method.
        method: String,
        /// The resolved path template.
        path: String,
    },

    /// The message body is not parseable JSON.
    MalformedBody {
        /// Parser diagnostic.
        reason: String,
    },

    /// The request body does not conform to the schema the contract assigns
    /// to its route.
    InvalidRequest(ConformanceError),

    /// The response body does not conform to the schema the contract assigns
    /// to its route.
    InvalidResponse(ConformanceError),

    /// Reading the contract document failed.
    Io(io::Error),

    /// The contract document is not parseable YAML/JSON.
    DocumentParse {
        /// Parser diagnostic.
        reason: String,
    },

    /// The engine could not compile the schema fragment.
    SchemaCompile {
        /// The schema pointer that failed to compile.
        pointer: String,
        /// Engine diagnostic.
        reason: String,
    },

    /// A pointer passed route resolution but addresses nothing in the stored
    /// document.
    UnresolvableSchema {
        /// The dangling schema pointer.
        pointer: String,
    },
}

impl ValidatorError {
    /// True when the failure is a contract-routing mismatch: the requested
    /// path/method/status/content-type combination is not declared.
    pub fn is_routing_mismatch(&self) -> bool {
        matches!(
            self,
            ValidatorError::PathNotFound { .. }
                | ValidatorError::MethodNotFound { .. }
                | ValidatorError::StatusCodeNotFound { .. }
                | ValidatorError::ContentTypeNotFound { .. }
        )
    }

    /// True when the failure is a contract-conformance mismatch: the route is
    /// declared but the body violates its schema.
    pub fn is_conformance_mismatch(&self) -> bool {
        matches!(
            self,
            ValidatorError::InvalidRequest(_) | ValidatorError::InvalidResponse(_)
        )
    }
}

impl Display for ValidatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::ValidatorError::*;

        match self {
            PathNotFound { path } => {
                write!(f, "path '{}' not found in the contract", path)
            }
            MethodNotFound { method, path } => {
                write!(f, "method '{}' not found under path '{}'", method, path)
            }
            StatusCodeNotFound {
                status,
                method,
                path,
            } => write!(
                f,
                "status code {} not found under '{}' '{}'",
                status, method, path
            ),
            ContentTypeNotFound {
                content_type,
                status: Some(status),
                method,
                path,
            } => write!(
                f,
                "content type '{}' not found under '{}' '{}' response {}",
                content_type, method, path, status
            ),
            ContentTypeNotFound {
                content_type,
                status: None,
                method,
                path,
            } => write!(
                f,
                "content type '{}' not found under '{}' '{}' request body",
                content_type, method, path
            ),
            MalformedBody { reason } => {
                write!(f, "message body is not valid JSON: {}", reason)
            }
            InvalidRequest(failure) => {
                write!(f, "request body violates the contract: {}", failure)
            }
            InvalidResponse(failure) => {
                write!(f, "response body violates the contract: {}", failure)
            }
            Io(error) => write!(f, "IO Error: {}", error),
            DocumentParse { reason } => {
                write!(f, "failed to parse contract document: {}", reason)
            }
            SchemaCompile { pointer, reason } => {
                write!(f, "failed to compile schema at '{}': {}", pointer, reason)
            }
            UnresolvableSchema { pointer } => {
                write!(f, "no schema found at '{}'", pointer)
            }
        }
    }
}

impl From<io::Error> for ValidatorError {
    fn from(e: io::Error) -> Self {
        ValidatorError::Io(e)
    }
}

impl std::error::Error for ValidatorError {}

/// Helper type alias for Result using ValidatorError.
pub type ValidatorResult<T> = Result<T, ValidatorError>;
