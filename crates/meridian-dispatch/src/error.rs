//! Error types for the dispatch engine.

use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Dispatch errors.
///
/// The variant decides the engine's recovery policy: assignment failures are
/// retried after a delay, submission and lookup failures terminate the
/// placement and are surfaced upstream, cancellation failures are logged and
/// dropped.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The resource cluster could not reserve an executor for the request.
    #[error("no task executor available: {0}")]
    AssignmentUnavailable(String),

    /// The selected executor rejected the task submission.
    #[error("task submission rejected: {0}")]
    SubmissionRejected(String),

    /// Gateway or registration lookup failed.
    #[error("task executor lookup failed: {0}")]
    Lookup(String),

    /// The executor failed to cancel a task.
    #[error("task cancellation failed: {0}")]
    Cancellation(String),

    /// The engine's event loop has stopped.
    #[error("dispatch engine stopped")]
    Stopped,
}

impl DispatchError {
    /// Create an assignment-unavailable error.
    #[must_use]
    pub fn assignment_unavailable(msg: impl Into<String>) -> Self {
        Self::AssignmentUnavailable(msg.into())
    }

    /// Create a submission-rejected error.
    #[must_use]
    pub fn submission_rejected(msg: impl Into<String>) -> Self {
        Self::SubmissionRejected(msg.into())
    }

    /// Create a lookup error.
    #[must_use]
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a cancellation error.
    #[must_use]
    pub fn cancellation(msg: impl Into<String>) -> Self {
        Self::Cancellation(msg.into())
    }
}

/// Stringify an error and its source chain, outermost first.
///
/// The format is informational only; it feeds the `cause` field of
/// launch-failure events.
#[must_use]
pub fn error_chain_string(error: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
