//! HTTP layer
//!
//! Every API call goes through a [`RateLimitedTransport`], which waits on a
//! shared token bucket, sends the request through an [`HttpExecutor`] and
//! retries throttled responses.

pub use executor::HttpExecutor;
pub use transport::RateLimitedTransport;

pub mod executor;
pub mod transport;

// Re-export HTTP types from the http crate for convenience
pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
