//! Executor-bound stage payload.

use serde::{Deserialize, Serialize};

use crate::ids::WorkerId;
use crate::registration::{TaskExecutorRegistration, WorkerPorts};
use crate::schedule::ScheduleRequest;

/// Payload handed to a task executor to launch one worker of a stage.
///
/// Built purely from a [`ScheduleRequest`] and the selected executor's
/// [`TaskExecutorRegistration`]; construction performs no I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteStageRequest {
    /// Worker the executor is asked to run.
    pub worker_id: WorkerId,
    /// Human-readable job name.
    pub job_name: String,
    /// Stage of the job this worker implements.
    pub stage_num: u32,
    /// Total number of stages in the job.
    pub total_stages: u32,
    /// URL of the job artifact the executor downloads.
    pub artifact_url: String,
    /// Port block the executor assigned to this worker.
    pub ports: WorkerPorts,
    /// Job parameters handed to the stage code.
    pub parameters: Vec<(String, String)>,
}

impl ExecuteStageRequest {
    /// Build the executor payload for `request` on the executor described by
    /// `registration`.
    #[must_use]
    pub fn of(request: &ScheduleRequest, registration: &TaskExecutorRegistration) -> Self {
        Self {
            worker_id: request.worker_id.clone(),
            job_name: request.job_name.clone(),
            stage_num: request.stage_num,
            total_stages: request.total_stages,
            artifact_url: request.artifact_url.clone(),
            ports: registration.ports.clone(),
            parameters: request.parameters.clone(),
        }
    }
}
