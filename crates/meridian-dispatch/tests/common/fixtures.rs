//! Test fixtures for dispatch engine integration tests.

use meridian_proto::{
    ClusterId, MachineDefinition, ScheduleRequest, TaskExecutorId, TaskExecutorRegistration,
    WorkerId, WorkerPorts,
};

/// Creates a worker ID for `job` at `index`, first submission.
pub fn worker(job: &str, index: u32) -> WorkerId {
    WorkerId::new(job, index, 1)
}

/// Creates a schedule request with the default machine shape and a filled-in
/// job payload.
pub fn request(job: &str, index: u32) -> ScheduleRequest {
    ScheduleRequest::new(worker(job, index), 0, MachineDefinition::default())
        .with_job_name(job)
        .with_artifact_url(format!("https://artifacts.example.com/{job}.zip"))
        .with_total_stages(1)
}

/// Creates a consecutive port block starting at `base`.
pub fn ports(base: u16) -> WorkerPorts {
    WorkerPorts::new(base, base + 1, base + 2, base + 3, vec![base + 4])
}

/// Creates an executor registration large enough for any default-shaped
/// request.
pub fn registration(id: &str, hostname: &str, base_port: u16) -> TaskExecutorRegistration {
    TaskExecutorRegistration {
        task_executor_id: TaskExecutorId::new(id),
        cluster_id: Some(ClusterId::new("cluster-main")),
        hostname: hostname.to_owned(),
        ports: ports(base_port),
        machine: MachineDefinition::new(4.0, 4096.0, 8192.0, 1024.0, 8),
    }
}
