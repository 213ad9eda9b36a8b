#![deny(missing_docs)]

//! # Route Resolution
//!
//! Walks the contract's routing levels for one message (path, then method,
//! then status code for responses, then content type), confirming existence
//! at each level before descending, and builds the JSON Pointer addressing
//! the schema fragment for the confirmed route.
//!
//! Each stage consumes the resolution value and returns it with one more
//! level confirmed, so a validation call is a single `?`-chained pipeline
//! that short-circuits on the earliest missing level. Stages must run in
//! order: every existence check is scoped by the previous stage's confirmed
//! value, and a skipped stage reports as that earlier level being missing.

use crate::error::{ValidatorError, ValidatorResult};
use crate::oas::document::{Document, Operation, PathItem, ResponseObject};
use std::fmt;

/// Whether a resolution is for a request body or a response body.
///
/// Responses resolve an extra status-code level and look up content types
/// under `responses.<code>.content`; requests look under
/// `requestBody.content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageKind {
    /// Request-body validation.
    Request,
    /// Response validation.
    Response,
}

/// Pointer to the schema fragment the contract assigns to one confirmed
/// route.
///
/// Displays as `<documentId>#/paths/<escapedPath>/<method>/...` with `/`
/// escaped as `~1` (and `~` as `~0`) in path and content-type segments, per
/// JSON Pointer rules. Produced fresh per call and not retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPointer {
    document: String,
    fragment: String,
}

impl SchemaPointer {
    /// Pointer to a request-body schema.
    pub(crate) fn for_request(
        document: &str,
        path: &str,
        method: &str,
        content_type: &str,
    ) -> Self {
        let fragment = format!(
            "/paths/{}/{}/requestBody/content/{}/schema",
            escape_pointer_segment(path),
            method,
            escape_pointer_segment(content_type)
        );
        Self {
            document: document.to_string(),
            fragment,
        }
    }

    /// Pointer to a response schema.
    pub(crate) fn for_response(
        document: &str,
        path: &str,
        method: &str,
        status: u16,
        content_type: &str,
    ) -> Self {
        let fragment = format!(
            "/paths/{}/{}/responses/{}/content/{}/schema",
            escape_pointer_segment(path),
            method,
            status,
            escape_pointer_segment(content_type)
        );
        Self {
            document: document.to_string(),
            fragment,
        }
    }

    /// The identifier of the document the fragment lives in.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// The JSON Pointer fragment, with a leading `/`.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

impl fmt::Display for SchemaPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.document, self.fragment)
    }
}

/// Escapes a JSON Pointer segment: `~` as `~0`, then `/` as `~1`.
pub(crate) fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Strips everything from the first `?` onward.
fn strip_query(path: &str) -> &str {
    match path.find('?') {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Per-call resolution state, threaded through the stage pipeline.
///
/// Holds references into the contract for each confirmed level; the final
/// stage consumes the value and yields the [`SchemaPointer`].
#[derive(Debug)]
pub(crate) struct Resolution<'doc> {
    document: &'doc Document,
    document_id: &'doc str,
    kind: MessageKind,
    path: String,
    path_item: Option<&'doc PathItem>,
    method: String,
    operation: Option<&'doc Operation>,
    status: Option<u16>,
    response: Option<&'doc ResponseObject>,
}

impl<'doc> Resolution<'doc> {
    /// Starts a request-mode resolution.
    pub(crate) fn request(document: &'doc Document, document_id: &'doc str) -> Self {
        Self::new(document, document_id, MessageKind::Request)
    }

    /// Starts a response-mode resolution.
    pub(crate) fn response(document: &'doc Document, document_id: &'doc str) -> Self {
        Self::new(document, document_id, MessageKind::Response)
    }

    fn new(document: &'doc Document, document_id: &'doc str, kind: MessageKind) -> Self {
        Self {
            document,
            document_id,
            kind,
            path: String::new(),
            path_item: None,
            method: String::new(),
            operation: None,
            status: None,
            response: None,
        }
    }

    /// Confirms the path level.
    ///
    /// Strips the query string, then requires the sanitized name to be a key
    /// under `paths`. Templates match literally; `/users/{id}` only matches
    /// the string `/users/{id}`.
    pub(crate) fn path(mut self, raw_path: &str) -> ValidatorResult<Self> {
        let sanitized = strip_query(raw_path);
        match self.document.path_item(sanitized) {
            Some(item) => {
                self.path = sanitized.to_string();
                self.path_item = Some(item);
                Ok(self)
            }
            None => Err(ValidatorError::PathNotFound {
                path: sanitized.to_string(),
            }),
        }
    }

    /// Confirms the method level under the confirmed path.
    ///
    /// The method is lower-cased before lookup.
    pub(crate) fn method(mut self, method: &str) -> ValidatorResult<Self> {
        let method = method.to_ascii_lowercase();
        let item = self.path_item.ok_or_else(|| ValidatorError::PathNotFound {
            path: self.path.clone(),
        })?;
        match item.operation(&method) {
            Some(operation) => {
                self.method = method;
                self.operation = Some(operation);
                Ok(self)
            }
            None => Err(ValidatorError::MethodNotFound {
                method,
                path: self.path.clone(),
            }),
        }
    }

    /// Confirms the status-code level under the confirmed operation.
    /// Response mode only; request resolution never runs this stage.
    pub(crate) fn status(mut self, status: u16) -> ValidatorResult<Self> {
        let operation = self
            .operation
            .ok_or_else(|| ValidatorError::MethodNotFound {
                method: self.method.clone(),
                path: self.path.clone(),
            })?;
        match operation.response(status) {
            Some(response) => {
                self.status = Some(status);
                self.response = Some(response);
                Ok(self)
            }
            None => Err(ValidatorError::StatusCodeNotFound {
                status,
                method: self.method.clone(),
                path: self.path.clone(),
            }),
        }
    }

    /// Confirms the content-type level and finishes the pointer.
    ///
    /// Branches on the message kind: responses look under the confirmed
    /// response's `content`, requests under the operation's
    /// `requestBody.content`.
    pub(crate) fn content_type(self, content_type: &str) -> ValidatorResult<SchemaPointer> {
        match self.kind {
            MessageKind::Response => {
                let declared = self
                    .response
                    .map(|response| response.media_type(content_type).is_some())
                    .unwrap_or(false);
                match (declared, self.status) {
                    (true, Some(status)) => Ok(SchemaPointer::for_response(
                        self.document_id,
                        &self.path,
                        &self.method,
                        status,
                        content_type,
                    )),
                    _ => Err(self.content_type_error(content_type)),
                }
            }
            MessageKind::Request => {
                let declared = self
                    .operation
                    .and_then(|operation| operation.request_body.as_ref())
                    .map(|body| body.media_type(content_type).is_some())
                    .unwrap_or(false);
                if declared {
                    Ok(SchemaPointer::for_request(
                        self.document_id,
                        &self.path,
                        &self.method,
                        content_type,
                    ))
                } else {
                    Err(self.content_type_error(content_type))
                }
            }
        }
    }

    fn content_type_error(&self, content_type: &str) -> ValidatorError {
        ValidatorError::ContentTypeNotFound {
            content_type: content_type.to_string(),
            status: self.status,
            method: self.method.clone(),
            path: self.path.clone(),
        }
    }
}
