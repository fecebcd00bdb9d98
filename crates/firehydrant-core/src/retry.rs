//! Retry policy for throttled requests.
//!
//! The API answers with `429 Too Many Requests` when a caller exceeds its
//! quota. [`ThrottleBackoff`] decides whether such a response is retried and
//! how long to wait first. Nothing but 429 is ever retried.
//!
//! # Examples
//!
//! ```rust
//! use firehydrant_core::retry::ThrottleBackoff;
//! use std::time::Duration;
//!
//! let backoff = ThrottleBackoff::builder()
//!     .default_delay(Duration::from_secs(2))
//!     .build();
//!
//! assert!(backoff.should_retry(429, 1));
//! assert!(!backoff.should_retry(503, 1));
//! assert_eq!(backoff.delay(Some("10")), Duration::from_secs(10));
//! assert_eq!(backoff.delay(Some("45")), Duration::from_secs(2));
//! ```

use std::time::Duration;

/// Status code that triggers a retry.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Total tries per logical request, first attempt included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Delay used when the server gives no usable `Retry-After`.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(10);

/// `Retry-After` values at or above this are ignored.
pub const RETRY_AFTER_CEILING: Duration = Duration::from_secs(30);

/// Bounded retry policy for 429 responses.
///
/// - at most `max_attempts` tries in total
/// - the wait before a retry is the server's `Retry-After` (whole seconds)
///   when it is strictly below `ceiling`, otherwise `default_delay`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleBackoff {
    default_delay: Duration,
    ceiling: Duration,
    max_attempts: u32,
}

impl Default for ThrottleBackoff {
    /// Defaults:
    /// - `default_delay`: 10s
    /// - `ceiling`: 30s
    /// - `max_attempts`: 5
    fn default() -> Self {
        Self {
            default_delay: DEFAULT_BACKOFF,
            ceiling: RETRY_AFTER_CEILING,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ThrottleBackoff {
    /// Create a policy with the given default delay and standard limits.
    pub fn new(default_delay: Duration) -> Self {
        Self {
            default_delay,
            ..Self::default()
        }
    }

    /// Create a new builder.
    pub fn builder() -> ThrottleBackoffBuilder {
        ThrottleBackoffBuilder::default()
    }

    /// Replace the default delay, keeping the other limits.
    pub fn with_default_delay(mut self, default_delay: Duration) -> Self {
        self.default_delay = default_delay;
        self
    }

    /// Delay used when `Retry-After` is missing or unusable.
    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    /// Upper bound (exclusive) on honored `Retry-After` values.
    pub fn ceiling(&self) -> Duration {
        self.ceiling
    }

    /// Maximum number of tries, first attempt included.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether a response with `status` on try number `attempt` (1-based)
    /// should be retried.
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        status == TOO_MANY_REQUESTS && attempt < self.max_attempts
    }

    /// Wait before the next try, given the raw `Retry-After` header value.
    pub fn delay(&self, retry_after: Option<&str>) -> Duration {
        retry_after
            .and_then(parse_retry_after)
            .filter(|hint| *hint < self.ceiling)
            .unwrap_or(self.default_delay)
    }
}

/// Parse a delta-seconds `Retry-After` value.
///
/// HTTP-date values and negative numbers yield `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Builder for [`ThrottleBackoff`].
#[derive(Debug, Default)]
pub struct ThrottleBackoffBuilder {
    default_delay: Option<Duration>,
    ceiling: Option<Duration>,
    max_attempts: Option<u32>,
}

impl ThrottleBackoffBuilder {
    /// Delay used when the server gives no usable `Retry-After`.
    ///
    /// Default: 10s
    pub fn default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = Some(delay);
        self
    }

    /// Exclusive upper bound on honored `Retry-After` values.
    ///
    /// Default: 30s
    pub fn ceiling(mut self, ceiling: Duration) -> Self {
        self.ceiling = Some(ceiling);
        self
    }

    /// Total tries per request. Zero is treated as one.
    ///
    /// Default: 5
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Build the policy.
    pub fn build(self) -> ThrottleBackoff {
        let defaults = ThrottleBackoff::default();
        ThrottleBackoff {
            default_delay: self.default_delay.unwrap_or(defaults.default_delay),
            ceiling: self.ceiling.unwrap_or(defaults.ceiling),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let backoff = ThrottleBackoff::default();
        assert_eq!(backoff.default_delay(), Duration::from_secs(10));
        assert_eq!(backoff.ceiling(), Duration::from_secs(30));
        assert_eq!(backoff.max_attempts(), 5);
    }

    #[test]
    fn test_only_429_is_retried() {
        let backoff = ThrottleBackoff::default();
        assert!(backoff.should_retry(429, 1));
        for status in [200, 204, 400, 404, 408, 500, 502, 503, 529] {
            assert!(!backoff.should_retry(status, 1), "status {status}");
        }
    }

    #[test]
    fn test_attempt_bound() {
        let backoff = ThrottleBackoff::default();
        assert!(backoff.should_retry(429, 4));
        assert!(!backoff.should_retry(429, 5));
        assert!(!backoff.should_retry(429, 6));
    }

    #[test]
    fn test_retry_after_honored_below_ceiling() {
        let backoff = ThrottleBackoff::new(Duration::from_secs(3));
        assert_eq!(backoff.delay(Some("10")), Duration::from_secs(10));
        assert_eq!(backoff.delay(Some("0")), Duration::ZERO);
        assert_eq!(backoff.delay(Some("29")), Duration::from_secs(29));
        assert_eq!(backoff.delay(Some(" 7 ")), Duration::from_secs(7));
    }

    #[test]
    fn test_retry_after_at_or_above_ceiling_uses_default() {
        let backoff = ThrottleBackoff::new(Duration::from_secs(3));
        assert_eq!(backoff.delay(Some("30")), Duration::from_secs(3));
        assert_eq!(backoff.delay(Some("45")), Duration::from_secs(3));
    }

    #[test]
    fn test_unparseable_retry_after_uses_default() {
        let backoff = ThrottleBackoff::new(Duration::from_secs(3));
        assert_eq!(backoff.delay(None), Duration::from_secs(3));
        assert_eq!(backoff.delay(Some("")), Duration::from_secs(3));
        assert_eq!(backoff.delay(Some("-1")), Duration::from_secs(3));
        assert_eq!(backoff.delay(Some("1.5")), Duration::from_secs(3));
        assert_eq!(
            backoff.delay(Some("Wed, 21 Oct 2015 07:28:00 GMT")),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_builder() {
        let backoff = ThrottleBackoff::builder()
            .default_delay(Duration::from_millis(10))
            .ceiling(Duration::from_secs(5))
            .max_attempts(0)
            .build();

        assert_eq!(backoff.default_delay(), Duration::from_millis(10));
        assert_eq!(backoff.delay(Some("4")), Duration::from_secs(4));
        assert_eq!(backoff.delay(Some("5")), Duration::from_millis(10));
        assert_eq!(backoff.max_attempts(), 1);
        assert!(!backoff.should_retry(429, 1));
    }

    proptest! {
        #[test]
        fn prop_delay_never_reaches_ceiling_unless_default(secs in 0u64..100_000, default_ms in 0u64..60_000) {
            let default_delay = Duration::from_millis(default_ms);
            let backoff = ThrottleBackoff::new(default_delay);
            let delay = backoff.delay(Some(&secs.to_string()));

            prop_assert!(delay < RETRY_AFTER_CEILING || delay == default_delay);
            if secs < 30 {
                prop_assert_eq!(delay, Duration::from_secs(secs));
            } else {
                prop_assert_eq!(delay, default_delay);
            }
        }
    }
}
