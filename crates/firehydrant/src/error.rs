//! Error types for the FireHydrant client
//!
//! Every fallible operation returns [`Error`]. Two variants are meant to be
//! matched on directly:
//!
//! - [`Error::NotFound`] for any 404, whatever the body said
//! - [`Error::RateLimitTimeout`] when the caller's context gave up while
//!   waiting for the rate limiter
//!
//! Resource clients wrap failures with the operation name (see
//! [`Error::context`]); [`Error::is_not_found`] and
//! [`Error::is_rate_limit_timeout`] see through that wrapping.

use crate::envelope::ApiErrorEnvelope;
use firehydrant_core::error::WaitAborted;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with a client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the FireHydrant client.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller's context was cancelled or expired while waiting for the
    /// rate limiter. The request was never sent.
    #[error("rate limit timeout after {elapsed:?}")]
    RateLimitTimeout {
        /// Time spent waiting before giving up
        elapsed: Duration,
        /// Why the wait ended
        #[source]
        source: WaitAborted,
    },

    /// Resource not found (404).
    #[error("resource not found")]
    NotFound,

    /// The API returned a non-success status other than 404.
    #[error("API error (status {status}): {envelope}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Decoded error body
        envelope: ApiErrorEnvelope,
    },

    /// Failed to decode an API response body.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or request construction error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization of a request body failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// Context description
        context: String,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Map a non-success status and its body to an error.
    ///
    /// 404 always yields [`Error::NotFound`]. Any other status decodes the
    /// body as an [`ApiErrorEnvelope`]; if that fails the decode error itself
    /// is returned.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if status == 404 {
            return Error::NotFound;
        }

        match serde_json::from_slice::<ApiErrorEnvelope>(body) {
            Ok(envelope) => Error::Api { status, envelope },
            Err(e) => Error::ResponseValidation(e.to_string()),
        }
    }

    /// Add context to an error.
    pub fn context<C>(self, context: C) -> Self
    where
        C: std::fmt::Display,
    {
        Error::WithContext {
            context: context.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this is (or wraps) [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), Error::NotFound)
    }

    /// Whether this is (or wraps) [`Error::RateLimitTimeout`].
    pub fn is_rate_limit_timeout(&self) -> bool {
        matches!(self.root(), Error::RateLimitTimeout { .. })
    }

    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Error::NotFound => Some(404),
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::error::Error as _;

    #[test]
    fn test_error_404_not_found_ignores_body() {
        for body in [&b""[..], b"not json", br#"{"error":"Record not found"}"#] {
            assert_matches!(Error::from_response(404, body), Error::NotFound);
        }
    }

    #[test]
    fn test_error_envelope_parsing() {
        let body = br#"{"error":"Validation failed","detail":"name is taken","messages":["name must be unique"]}"#;

        match Error::from_response(422, body) {
            Error::Api { status, envelope } => {
                assert_eq!(status, 422);
                assert_eq!(envelope.error.as_deref(), Some("Validation failed"));
                assert_eq!(envelope.detail.as_deref(), Some("name is taken"));
                assert_eq!(envelope.messages, vec!["name must be unique"]);
            }
            other => panic!("Expected Api variant, got {other:?}"),
        }
    }

    #[test]
    fn test_error_display_carries_rendered_envelope() {
        let error = Error::from_response(400, br#"{"error":"E","detail":"D"}"#);
        assert_eq!(error.to_string(), "API error (status 400): error: E\ndetail: D");
    }

    #[test]
    fn test_error_invalid_json_surfaces_decode_error() {
        let error = Error::from_response(500, b"Internal Server Error");
        assert_matches!(error, Error::ResponseValidation(msg) if msg.contains("expected value"));
    }

    #[test]
    fn test_error_empty_body_surfaces_decode_error() {
        assert_matches!(
            Error::from_response(502, b""),
            Error::ResponseValidation(_)
        );
    }

    #[test]
    fn test_error_context() {
        let error = Error::NotFound.context("could not get service");

        match &error {
            Error::WithContext { context, .. } => {
                assert_eq!(context, "could not get service");
            }
            _ => panic!("Expected WithContext variant"),
        }
        assert_eq!(error.to_string(), "could not get service: resource not found");
    }

    #[test]
    fn test_is_not_found_sees_through_context() {
        let error = Error::NotFound
            .context("could not get team")
            .context("sync failed");

        assert!(error.is_not_found());
        assert_eq!(error.status(), Some(404));
        assert!(!Error::Connection("refused".into()).is_not_found());
    }

    #[test]
    fn test_rate_limit_timeout_source() {
        let error = Error::RateLimitTimeout {
            elapsed: Duration::from_millis(250),
            source: WaitAborted::DeadlineExceeded,
        }
        .context("could not list services");

        assert!(error.is_rate_limit_timeout());
        assert!(!error.is_not_found());
        assert_eq!(error.status(), None);

        let root = error.root();
        assert_eq!(
            root.source().map(|s| s.to_string()),
            Some("context deadline exceeded".to_string())
        );
    }
}
