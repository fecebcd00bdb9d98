//! Rate-limited, retrying transport.
//!
//! One call to [`RateLimitedTransport::execute`] goes through these states:
//!
//! ```text
//! Idle -> Admitting -> Failed(rate limit timeout)
//!                   -> Executing -> Fatal(connection error)
//!                                -> GotResponse -> Done
//!                                               -> (429, tries left) sleep -> Executing
//! ```
//!
//! The whole sequence runs under a per-transport mutex, so concurrent
//! callers queue in FIFO order and at most one request is between limiter
//! admission and its final response at any time.
//!
//! # Cancellation
//!
//! The caller's [`RequestContext`] is only consulted while waiting for the
//! limiter. Once a request has been sent, neither the in-flight call nor the
//! backoff sleep between retries observes cancellation or deadlines; the
//! call finishes on its own schedule. Dropping the returned future still
//! aborts it and releases the queue.

use super::HttpExecutor;
use crate::error::{Error, Result};
use crate::observability::RetryEvent;
use firehydrant_core::context::RequestContext;
use firehydrant_core::limiter::Limiter;
use firehydrant_core::retry::ThrottleBackoff;
use reqwest::header::RETRY_AFTER;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Wraps an [`HttpExecutor`] with a token-bucket limiter and bounded retry
/// of throttled (429) responses.
///
/// # Example
///
/// ```rust,no_run
/// use firehydrant::{RateLimitedTransport, RequestContext, TokenBucket};
/// use std::{sync::Arc, time::Duration};
///
/// # async fn example() -> firehydrant::Result<()> {
/// let http = reqwest::Client::new();
/// let transport = RateLimitedTransport::new(Arc::new(http.clone()), Arc::new(TokenBucket::new(10.0, 10)))
///     .with_backoff(Duration::from_secs(2));
///
/// let request = http.get("https://api.firehydrant.io/v1/ping").build().unwrap();
/// let response = transport.execute(&RequestContext::background(), request).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimitedTransport {
    executor: Arc<dyn HttpExecutor>,
    limiter: Arc<dyn Limiter>,
    backoff: ThrottleBackoff,
    guard: Mutex<()>,
}

impl RateLimitedTransport {
    /// Create a transport with the default throttle policy (10s backoff,
    /// 5 attempts, `Retry-After` honored below 30s).
    pub fn new(executor: Arc<dyn HttpExecutor>, limiter: Arc<dyn Limiter>) -> Self {
        Self {
            executor,
            limiter,
            backoff: ThrottleBackoff::default(),
            guard: Mutex::new(()),
        }
    }

    /// Replace the limiter.
    pub fn with_limiter(mut self, limiter: Arc<dyn Limiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Replace the default backoff used when `Retry-After` is absent or too large.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = self.backoff.with_default_delay(backoff);
        self
    }

    /// Replace the whole throttle policy.
    pub fn with_policy(mut self, policy: ThrottleBackoff) -> Self {
        self.backoff = policy;
        self
    }

    /// Replace the limiter in place.
    pub fn set_limiter(&mut self, limiter: Arc<dyn Limiter>) {
        self.limiter = limiter;
    }

    /// Replace the default backoff in place.
    pub fn set_backoff(&mut self, backoff: Duration) {
        self.backoff = self.backoff.with_default_delay(backoff);
    }

    /// The throttle policy in use.
    pub fn policy(&self) -> &ThrottleBackoff {
        &self.backoff
    }

    /// The limiter in use.
    pub fn limiter(&self) -> &Arc<dyn Limiter> {
        &self.limiter
    }

    /// Send `request`, waiting for the limiter first and retrying 429s.
    ///
    /// The returned response may carry any status, including a final 429
    /// once all attempts are used; status handling is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::RateLimitTimeout`] if `ctx` ends before a permit is granted
    /// - [`Error::Connection`] / [`Error::Timeout`] if no response was
    ///   received; these are never retried
    ///
    /// A request whose body cannot be cloned (a streaming body) is sent once;
    /// if it is throttled, that 429 is returned as the final response.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        request: reqwest::Request,
    ) -> Result<reqwest::Response> {
        let _guard = self.guard.lock().await;

        let waiting = Instant::now();
        if let Err(source) = self.limiter.acquire(ctx).await {
            return Err(Error::RateLimitTimeout {
                elapsed: waiting.elapsed(),
                source,
            });
        }

        let started = Instant::now();
        let mut attempt = 1;
        let mut spare = request.try_clone();
        let mut this_try = request;
        loop {
            let response = self.executor.send(this_try).await?;
            let status = response.status().as_u16();
            if !self.backoff.should_retry(status, attempt) {
                return Ok(response);
            }

            let Some(next) = spare.take() else {
                tracing::warn!(
                    status_code = status,
                    attempt,
                    "request body cannot be replayed, returning throttled response"
                );
                return Ok(response);
            };

            let backoff = self.backoff.delay(
                response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok()),
            );
            drop(response);

            RetryEvent {
                status_code: status,
                duration: started.elapsed(),
                attempt,
                backoff,
            }
            .log();

            tokio::time::sleep(backoff).await;
            spare = next.try_clone();
            this_try = next;
            attempt += 1;
        }
    }
}
