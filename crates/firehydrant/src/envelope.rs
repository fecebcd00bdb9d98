//! Response envelope handling.
//!
//! Every endpoint uses the same contract: a 2xx status carries the resource
//! (or nothing, for 204), anything else carries an error envelope:
//!
//! ```json
//! { "error": "Validation failed", "detail": "...", "messages": ["name is taken"] }
//! ```
//!
//! [`decode_response`] reads the body once and turns it into either the
//! requested type or a classified [`Error`].

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error body returned by the API.
///
/// All fields are optional and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorEnvelope {
    /// Short error summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Longer explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Individual messages, usually one per invalid field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl ApiErrorEnvelope {
    /// Whether no field carries any text.
    pub fn is_empty(&self) -> bool {
        self.error.as_deref().is_none_or(str::is_empty)
            && self.detail.as_deref().is_none_or(str::is_empty)
            && self.messages.is_empty()
    }
}

impl fmt::Display for ApiErrorEnvelope {
    /// Renders populated fields only, in the order error, detail, messages,
    /// one per line. Messages are newline separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = Vec::with_capacity(3);

        if let Some(error) = self.error.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("error: {error}"));
        }
        if let Some(detail) = self.detail.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("detail: {detail}"));
        }
        if !self.messages.is_empty() {
            lines.push(format!("messages: {}", self.messages.join("\n")));
        }

        f.write_str(&lines.join("\n"))
    }
}

/// Read a response body and decode it according to the status code.
///
/// See [`decode_body`] for the mapping.
///
/// # Errors
///
/// - [`Error::Connection`] if the body cannot be read
/// - anything [`decode_body`] returns
pub async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Connection(e.to_string()))?;

    decode_body(status, &body)
}

/// Decode an already-read body according to the status code.
///
/// - 2xx: the body is decoded as `T`. An empty body (e.g. 204) decodes as
///   JSON `null`, so `()` and `Option<_>` targets accept it.
/// - 404: [`Error::NotFound`], whatever the body.
/// - anything else: [`Error::Api`] with the decoded envelope, or
///   [`Error::ResponseValidation`] if the envelope itself cannot be decoded.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T> {
    if !(200..300).contains(&status) {
        return Err(Error::from_response(status, body));
    }

    let body = if body.iter().all(u8::is_ascii_whitespace) {
        &b"null"[..]
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| Error::ResponseValidation(e.to_string()))
}
