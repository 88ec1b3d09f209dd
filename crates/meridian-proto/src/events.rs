//! Worker lifecycle events reported to the job-management plane.

use serde::{Deserialize, Serialize};

use crate::ids::WorkerId;
use crate::registration::WorkerPorts;

/// Outcome of placing one worker, published upstream so job state stays
/// consistent with cluster state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerEvent {
    /// The selected executor accepted the submission; the worker is
    /// considered running for job-management purposes.
    Launched {
        /// Worker that was placed.
        worker_id: WorkerId,
        /// Stage the worker belongs to.
        stage_num: u32,
        /// Hostname of the executor running the worker.
        hostname: String,
        /// Resource ID of the executor.
        resource_id: String,
        /// Resource ID of the executor's cluster, if it advertises one.
        cluster_resource_id: Option<String>,
        /// Port block assigned to the worker.
        ports: WorkerPorts,
    },
    /// Placement failed terminally; the job-management plane decides whether
    /// to re-drive the request.
    LaunchFailed {
        /// Worker that could not be placed.
        worker_id: WorkerId,
        /// Stage the worker belongs to.
        stage_num: u32,
        /// Stringified failure cause, informational only.
        cause: String,
    },
}

impl WorkerEvent {
    /// The worker this event is about.
    #[must_use]
    pub const fn worker_id(&self) -> &WorkerId {
        match self {
            Self::Launched { worker_id, .. } | Self::LaunchFailed { worker_id, .. } => worker_id,
        }
    }

    /// The stage the worker belongs to.
    #[must_use]
    pub const fn stage_num(&self) -> u32 {
        match self {
            Self::Launched { stage_num, .. } | Self::LaunchFailed { stage_num, .. } => *stage_num,
        }
    }
}
