//! Error types shared by the core primitives.

use thiserror::Error;

/// Why a wait on a [`RequestContext`](crate::context::RequestContext) ended
/// before the awaited resource became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitAborted {
    /// The caller's cancellation token fired.
    #[error("context canceled")]
    Cancelled,

    /// The caller's deadline passed, or would pass before the wait could finish.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}
