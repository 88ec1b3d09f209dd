//! Meridian dispatch engine - placing stage workers onto task executors.
//!
//! The engine owns the lifecycle of turning a
//! [`ScheduleRequest`](meridian_proto::ScheduleRequest) into a running task
//! on a selected task executor:
//!
//! - **Assignment**: ask the resource cluster to reserve an executor that
//!   satisfies the request's machine definition
//! - **Submission**: hand the executor the stage payload through its gateway
//! - **Publication**: report `Launched` / `LaunchFailed` to the
//!   job-management plane
//! - **Cancellation**: resolve the hosting executor by hostname and cancel a
//!   worker's task
//!
//! # Architecture
//!
//! A single-consumer mailbox serialises every state transition; remote-call
//! outcomes are posted back to it as typed events rather than mutating state
//! from callbacks. Assignment failures are presumed transient (capacity) and
//! retried after a delay; submission failures are presumed request-specific
//! and surfaced upstream without retry.
//!
//! # Example
//!
//! ```ignore
//! use meridian_dispatch::{DispatchConfig, DispatchEngine};
//!
//! let engine = DispatchEngine::new(cluster, router, DispatchConfig::default());
//! let handle = engine.start();
//! handle.submit(request)?;
//! ```

pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod router;
pub mod timer;

// Re-export main types
pub use cluster::{MockGateway, MockResourceCluster, ResourceCluster, TaskExecutorGateway};
pub use config::DispatchConfig;
pub use engine::{DispatchEngine, DispatchHandle};
pub use error::{error_chain_string, DispatchError, DispatchResult};
pub use event::{DispatchEvent, ScheduleAttempt};
pub use router::{JobMessageRouter, MockRouter};
pub use timer::{Timer, TokioTimer};
