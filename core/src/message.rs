#![deny(missing_docs)]

//! # Message Bodies
//!
//! The seam between the validator and whatever HTTP abstraction produced the
//! message. The validator only ever reads the raw body bytes and parses them
//! as JSON; implementations decide where the bytes come from (a captured
//! fixture file, a test client response, a proxy tap).

use std::borrow::Cow;

/// Read access to the raw body of an HTTP request or response.
pub trait MessageBody {
    /// Returns the raw body bytes.
    fn body_bytes(&self) -> Cow<'_, [u8]>;
}

impl MessageBody for str {
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl MessageBody for String {
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl MessageBody for [u8] {
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl MessageBody for Vec<u8> {
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl MessageBody for serde_json::Value {
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(self.to_string().into_bytes())
    }
}

impl<T: MessageBody + ?Sized> MessageBody for &T {
    fn body_bytes(&self) -> Cow<'_, [u8]> {
        (**self).body_bytes()
    }
}
