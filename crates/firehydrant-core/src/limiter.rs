//! Admission control for outbound requests.
//!
//! A [`Limiter`] decides when the next request may be issued. The transport
//! holds one behind an `Arc<dyn Limiter>` so tests can swap in a fast or a
//! deliberately strict implementation.

use crate::context::RequestContext;
use crate::error::WaitAborted;
use async_trait::async_trait;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

/// A source of permits for outbound requests.
#[async_trait]
pub trait Limiter: Send + Sync + fmt::Debug {
    /// Wait until one permit is available and consume it.
    async fn until_ready(&self);

    /// Wait for a permit, giving up when `ctx` is cancelled or expires.
    ///
    /// An already-finished context fails without touching the limiter.
    async fn acquire(&self, ctx: &RequestContext) -> Result<(), WaitAborted> {
        if let Some(reason) = ctx.err() {
            return Err(reason);
        }

        tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            () = self.until_ready() => Ok(()),
        }
    }
}

/// Token bucket limiter backed by `governor`.
///
/// Permits refill at a steady rate up to a burst capacity.
///
/// # Examples
///
/// ```rust
/// use firehydrant_core::limiter::{Limiter, TokenBucket};
/// use firehydrant_core::context::RequestContext;
///
/// # async fn example() {
/// let bucket = TokenBucket::new(5.0, 1);
/// bucket.acquire(&RequestContext::background()).await.unwrap();
/// # }
/// ```
pub struct TokenBucket {
    inner: DefaultDirectRateLimiter,
    clock: DefaultClock,
    quota: Quota,
}

impl TokenBucket {
    /// Create a bucket refilling at `requests_per_second` with room for
    /// `burst` back-to-back requests.
    ///
    /// The rate is kept exact by refilling one permit every
    /// `1 / requests_per_second` (e.g. `0.5` is one permit every two seconds,
    /// `2.5` one every 400ms). Non-positive or non-finite rates fall back to
    /// one request per second; the period never drops below one nanosecond.
    /// A zero burst is treated as one.
    pub fn new(requests_per_second: f64, burst: u32) -> Self {
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        let quota = if !requests_per_second.is_finite() || requests_per_second <= 0.0 {
            Quota::per_second(NonZeroU32::MIN)
        } else {
            let period = Duration::from_secs_f64(1.0 / requests_per_second)
                .max(Duration::from_nanos(1));
            Quota::with_period(period).unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
        };

        Self::from_quota(quota.allow_burst(burst))
    }

    /// Create a bucket granting one permit per `period`, with `burst` capacity.
    ///
    /// Returns `None` for a zero period.
    pub fn with_period(period: Duration, burst: u32) -> Option<Self> {
        let burst = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(period).map(|quota| Self::from_quota(quota.allow_burst(burst)))
    }

    /// Create a bucket from an explicit governor quota.
    pub fn from_quota(quota: Quota) -> Self {
        Self {
            inner: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
            quota,
        }
    }

    /// Interval between two refilled permits.
    pub fn replenish_interval(&self) -> Duration {
        self.quota.replenish_interval()
    }

    /// Maximum number of permits available at once.
    pub fn burst_size(&self) -> u32 {
        self.quota.burst_size().get()
    }
}

impl fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBucket")
            .field("replenish_interval", &self.replenish_interval())
            .field("burst_size", &self.burst_size())
            .finish()
    }
}

#[async_trait]
impl Limiter for TokenBucket {
    async fn until_ready(&self) {
        self.inner.until_ready().await;
    }

    /// Fails fast with [`WaitAborted::DeadlineExceeded`] when the next permit
    /// cannot arrive before the context's deadline.
    async fn acquire(&self, ctx: &RequestContext) -> Result<(), WaitAborted> {
        if let Some(reason) = ctx.err() {
            return Err(reason);
        }

        let wait = match self.inner.check() {
            Ok(()) => return Ok(()),
            Err(not_until) => not_until.wait_time_from(self.clock.now()),
        };

        if ctx.remaining().is_some_and(|left| wait > left) {
            return Err(WaitAborted::DeadlineExceeded);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(wait = ?wait, "waiting for rate limiter permit");

        tokio::select! {
            biased;
            reason = ctx.done() => Err(reason),
            () = self.inner.until_ready() => Ok(()),
        }
    }
}

/// A limiter that admits every request immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

#[async_trait]
impl Limiter for Unlimited {
    async fn until_ready(&self) {}
}
