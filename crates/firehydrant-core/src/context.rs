//! Caller-supplied cancellation and deadlines.

use crate::error::WaitAborted;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation scope attached to a single API call.
///
/// A context carries an optional deadline and an optional cancellation
/// token. The default context never expires. Contexts are cheap to clone;
/// clones share the same token.
///
/// # Examples
///
/// ```rust
/// use firehydrant_core::context::RequestContext;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = RequestContext::background()
///     .with_timeout(Duration::from_secs(5))
///     .with_cancellation(token.clone());
///
/// assert!(ctx.err().is_none());
/// token.cancel();
/// assert!(ctx.err().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Set an absolute deadline. An earlier existing deadline wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline. `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns the abort reason if the context is already done.
    ///
    /// Cancellation is reported ahead of an expired deadline.
    pub fn err(&self) -> Option<WaitAborted> {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Some(WaitAborted::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(WaitAborted::DeadlineExceeded),
            _ => None,
        }
    }

    /// Resolves once the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a background context.
    pub async fn done(&self) -> WaitAborted {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => WaitAborted::Cancelled,
            () = deadline => WaitAborted::DeadlineExceeded,
        }
    }
}
