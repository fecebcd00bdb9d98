//! The seam between the transport and the network.
//!
//! [`HttpExecutor`] sends one fully built request and hands back whatever
//! came back. It performs no retries, rate limiting or status handling; that
//! all lives in [`RateLimitedTransport`](super::RateLimitedTransport).

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::fmt;

/// Sends a single HTTP request.
///
/// Implemented for [`reqwest::Client`]. Tests implement it to script
/// responses without a network.
#[async_trait]
pub trait HttpExecutor: Send + Sync + fmt::Debug {
    /// Send `request` once.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received at all
    /// ([`Error::Connection`] or [`Error::Timeout`]). Error statuses are
    /// returned as ordinary responses.
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response>;
}

#[async_trait]
impl HttpExecutor for reqwest::Client {
    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let timeout = request.timeout().copied();

        self.execute(request).await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(timeout.unwrap_or_default())
            } else {
                Error::Connection(e.to_string())
            }
        })
    }
}
