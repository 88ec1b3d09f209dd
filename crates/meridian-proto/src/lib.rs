//! Shared domain types for Meridian inter-component communication.
//!
//! These types flow between the control plane's dispatch engine, the resource
//! cluster, task executors, and the job-management plane:
//!
//! - **Identifiers**: workers, task executors, resource clusters
//! - **Resource shapes**: the machine definition a worker requires
//! - **Executor descriptors**: registrations and assigned port blocks
//! - **Requests**: scheduling input and the executor-bound stage payload
//! - **Lifecycle events**: worker launch outcomes reported upstream
//!
//! The crate is deliberately free of I/O and runtime dependencies; everything
//! here is plain data with serde derives.

mod events;
mod ids;
mod machine;
mod registration;
mod schedule;
mod stage;

pub use events::WorkerEvent;
pub use ids::{ClusterId, TaskExecutorId, WorkerId};
pub use machine::MachineDefinition;
pub use registration::{TaskExecutorRegistration, WorkerPorts};
pub use schedule::ScheduleRequest;
pub use stage::ExecuteStageRequest;
