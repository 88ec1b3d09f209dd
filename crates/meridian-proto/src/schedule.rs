//! Scheduling input.

use serde::{Deserialize, Serialize};

use crate::ids::{ClusterId, WorkerId};
use crate::machine::MachineDefinition;

/// Request to place one worker of a job stage onto a task executor.
///
/// The request is immutable; retries re-wrap the same request with a new
/// attempt number. Beyond the fields placement needs (`worker_id`,
/// `stage_num`, `machine_definition`), everything here is opaque payload
/// handed through to the selected executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Worker being placed.
    pub worker_id: WorkerId,
    /// Stage of the job this worker belongs to.
    pub stage_num: u32,
    /// Resource shape the worker requires.
    pub machine_definition: MachineDefinition,
    /// Human-readable job name.
    pub job_name: String,
    /// URL of the job artifact the executor downloads.
    pub artifact_url: String,
    /// Total number of stages in the job.
    pub total_stages: u32,
    /// Job parameters handed to the stage code.
    pub parameters: Vec<(String, String)>,
    /// Cluster the caller would prefer the worker to land on.
    pub preferred_cluster: Option<ClusterId>,
}

impl ScheduleRequest {
    /// Create a request with the minimal placement fields.
    #[must_use]
    pub fn new(worker_id: WorkerId, stage_num: u32, machine_definition: MachineDefinition) -> Self {
        Self {
            worker_id,
            stage_num,
            machine_definition,
            job_name: String::new(),
            artifact_url: String::new(),
            total_stages: 1,
            parameters: Vec::new(),
            preferred_cluster: None,
        }
    }

    /// Sets the job name.
    #[must_use]
    pub fn with_job_name(mut self, name: impl Into<String>) -> Self {
        self.job_name = name.into();
        self
    }

    /// Sets the artifact URL.
    #[must_use]
    pub fn with_artifact_url(mut self, url: impl Into<String>) -> Self {
        self.artifact_url = url.into();
        self
    }

    /// Sets the total stage count.
    #[must_use]
    pub const fn with_total_stages(mut self, total: u32) -> Self {
        self.total_stages = total;
        self
    }

    /// Sets the job parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<(String, String)>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the preferred cluster.
    #[must_use]
    pub fn with_preferred_cluster(mut self, cluster: ClusterId) -> Self {
        self.preferred_cluster = Some(cluster);
        self
    }
}
