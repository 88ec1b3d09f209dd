//! Identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one worker of a job stage: the smallest scheduling unit.
///
/// A worker is addressed by the job it belongs to, its index within the stage
/// (stable across resubmissions), and its number (incremented every time the
/// worker is resubmitted).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerId {
    /// Job this worker belongs to.
    pub job_id: String,
    /// Position of the worker within its stage.
    pub worker_index: u32,
    /// Monotone resubmission counter for this worker slot.
    pub worker_number: u32,
}

impl WorkerId {
    /// Create a new worker ID.
    #[must_use]
    pub fn new(job_id: impl Into<String>, worker_index: u32, worker_number: u32) -> Self {
        Self {
            job_id: job_id.into(),
            worker_index,
            worker_number,
        }
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-worker-{}-{}",
            self.job_id, self.worker_index, self.worker_number
        )
    }
}

/// Identifier of a cluster node capable of accepting and running tasks.
///
/// The inner value is the node's resource ID as known to the resource
/// cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskExecutorId(String);

impl TaskExecutorId {
    /// Create a task executor ID from a resource ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique task executor ID using ULID.
    #[must_use]
    pub fn generate() -> Self {
        Self(ulid::Ulid::new().to_string().to_lowercase())
    }

    /// Get the resource ID as a string slice.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskExecutorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TaskExecutorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of the resource cluster a task executor belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterId(String);

impl ClusterId {
    /// Create a new cluster ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_id_display() {
        let id = WorkerId::new("late-sine-function-1", 0, 1);
        assert_eq!(id.to_string(), "late-sine-function-1-worker-0-1");
    }

    #[test]
    fn worker_id_equality_covers_all_fields() {
        let a = WorkerId::new("job-1", 0, 1);
        let b = WorkerId::new("job-1", 0, 2);
        assert_ne!(a, b);
        assert_eq!(a, WorkerId::new("job-1", 0, 1));
    }

    #[test]
    fn generated_executor_ids_are_unique() {
        let a = TaskExecutorId::generate();
        let b = TaskExecutorId::generate();
        assert_ne!(a, b);
        assert!(!a.resource_id().is_empty());
    }
}
