//! Centralized observability utilities for structured logging
//!
//! All events go through `tracing`; the application decides where they end
//! up. Field names are stable so log queries can rely on them.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path relative to the base URL
    pub path: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body_size: None,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log request being sent
    pub fn log_request(&self) {
        debug!(
            method = %self.method,
            path = %self.path,
            body_size = self.body_size,
            "Sending HTTP request"
        );
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Time elapsed for the request, limiter wait and retries included
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Create new response metadata
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self { status, elapsed }
    }

    /// Log a response that decoded successfully
    pub fn log_success(&self, request: &RequestMetadata) {
        debug!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            "HTTP request succeeded"
        );
    }

    /// Log a response that was turned into an error
    pub fn log_error(&self, request: &RequestMetadata, error: &str) {
        debug!(
            method = %request.method,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            error = %error,
            "HTTP request failed"
        );
    }
}

/// One throttled attempt that is about to be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryEvent {
    /// Status of the throttled response (429)
    pub status_code: u16,
    /// Time since the first attempt was sent
    pub duration: Duration,
    /// 1-based number of the attempt that was throttled
    pub attempt: u32,
    /// Wait before the next attempt
    pub backoff: Duration,
}

impl RetryEvent {
    /// Emit the warn-level retry event.
    pub fn log(&self) {
        warn!(
            status_code = self.status_code,
            duration = ?self.duration,
            attempt = self.attempt,
            backoff = ?self.backoff,
            "request throttled, backing off before retry"
        );
    }
}

/// Log an identifier lookup against a resource collection.
pub fn log_lookup(resource: &str, id: &str) {
    debug!(resource = %resource, id = %id, "Looking up resource");
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Defaults to `firehydrant=info` when `RUST_LOG` is unset. Does nothing if
/// a global subscriber is already installed.
#[cfg(feature = "trace")]
#[cfg_attr(docsrs, doc(cfg(feature = "trace")))]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("firehydrant=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
