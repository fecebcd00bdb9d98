#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core building blocks for the FireHydrant API client.
//!
//! This crate holds the pieces of the client that have nothing to do with a
//! particular HTTP stack:
//!
//! - **Admission control** via the [`Limiter`](limiter::Limiter) trait
//!   - [`TokenBucket`](limiter::TokenBucket), a governor-backed token bucket
//!   - [`Unlimited`](limiter::Unlimited) for tests and trusted callers
//! - **Caller cancellation** via [`RequestContext`](context::RequestContext)
//! - **Throttle backoff** via [`ThrottleBackoff`](retry::ThrottleBackoff),
//!   the bounded 429 retry policy with `Retry-After` support
//! - **Pagination** via [`Page`](pagination::Page) and
//!   [`follow_pages`](pagination::follow_pages)
//!
//! # Examples
//!
//! ```rust
//! use firehydrant_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), WaitAborted> {
//! let bucket = TokenBucket::new(10.0, 10);
//! let ctx = RequestContext::background().with_timeout(Duration::from_secs(1));
//!
//! bucket.acquire(&ctx).await?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod limiter;
pub mod pagination;
pub mod retry;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use firehydrant_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::context::RequestContext;
    pub use crate::error::WaitAborted;
    pub use crate::limiter::{Limiter, TokenBucket, Unlimited};
    pub use crate::pagination::{Page, Pagination, follow_pages};
    pub use crate::retry::{ThrottleBackoff, ThrottleBackoffBuilder};
}
