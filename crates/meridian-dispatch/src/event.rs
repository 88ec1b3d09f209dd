//! The dispatch engine's message set.
//!
//! Every state transition in the engine is driven by one of these messages.
//! External callers produce `Schedule` and `Cancel`; the remaining variants
//! are internal, posted back to the mailbox by the async continuations the
//! handlers spawn (remote-call outcomes never mutate state directly).

use meridian_proto::{ScheduleRequest, TaskExecutorId, WorkerId};

use crate::error::{error_chain_string, DispatchError};

/// One attempt at placing a schedule request.
///
/// Wraps the immutable request with a 1-based attempt counter and, on
/// retries, the stringified cause of the previous failure.
#[derive(Debug, Clone)]
pub struct ScheduleAttempt {
    /// The request being placed.
    pub request: ScheduleRequest,
    /// 1-based attempt number.
    pub attempt: u32,
    /// Cause of the previous attempt's failure, if this is a retry.
    pub previous_failure: Option<String>,
}

impl ScheduleAttempt {
    /// Wrap a fresh request as its first attempt.
    #[must_use]
    pub const fn first(request: ScheduleRequest) -> Self {
        Self {
            request,
            attempt: 1,
            previous_failure: None,
        }
    }

    /// Returns true if this attempt follows an earlier failure.
    #[must_use]
    pub const fn is_retry(&self) -> bool {
        self.attempt > 1
    }

    /// Convert a failed assignment into the corresponding mailbox event.
    #[must_use]
    pub fn on_failure(self, cause: DispatchError) -> DispatchEvent {
        DispatchEvent::AssignFailed {
            attempt: self,
            cause,
        }
    }

    /// Rebuild the envelope for the next attempt, carrying `cause` forward.
    #[must_use]
    pub fn on_retry(self, cause: &DispatchError) -> Self {
        Self {
            request: self.request,
            attempt: self.attempt + 1,
            previous_failure: Some(error_chain_string(cause)),
        }
    }
}

/// Closed set of messages the engine's event loop dispatches on.
#[derive(Debug)]
pub enum DispatchEvent {
    /// Place (or re-place) a request on some executor.
    Schedule(ScheduleAttempt),
    /// Cancel the task of a worker hosted on `hostname`.
    Cancel {
        /// Worker whose task is cancelled.
        worker_id: WorkerId,
        /// Hostname of the executor currently hosting the worker.
        hostname: String,
    },
    /// The resource cluster reserved `executor` for the request.
    Assigned {
        /// The request being placed.
        request: ScheduleRequest,
        /// The reserved executor.
        executor: TaskExecutorId,
    },
    /// The resource cluster could not reserve an executor.
    AssignFailed {
        /// The attempt that failed.
        attempt: ScheduleAttempt,
        /// Why assignment failed.
        cause: DispatchError,
    },
    /// The executor acknowledged the task submission.
    Submitted {
        /// The request that was submitted.
        request: ScheduleRequest,
        /// Executor that accepted the task.
        executor: TaskExecutorId,
    },
    /// Submission (or a lookup it depends on) failed.
    SubmitFailed {
        /// The request whose submission failed.
        request: ScheduleRequest,
        /// Executor the submission was bound for.
        executor: TaskExecutorId,
        /// Why submission failed.
        cause: DispatchError,
    },
    /// Terminal no-op, completes a cancellation.
    Noop,
}
