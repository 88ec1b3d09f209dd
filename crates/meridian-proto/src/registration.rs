//! Task executor descriptors.

use serde::{Deserialize, Serialize};

use crate::ids::{ClusterId, TaskExecutorId};
use crate::machine::MachineDefinition;

/// The port block a task executor assigns to one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPorts {
    /// Port the worker serves metrics on.
    pub metrics_port: u16,
    /// Port for remote debugging.
    pub debug_port: u16,
    /// Port for the worker console.
    pub console_port: u16,
    /// Free-use port handed to the stage code.
    pub custom_port: u16,
    /// Ports the worker's sink listens on.
    pub sink_ports: Vec<u16>,
}

impl WorkerPorts {
    /// Create a port block.
    #[must_use]
    pub fn new(
        metrics_port: u16,
        debug_port: u16,
        console_port: u16,
        custom_port: u16,
        sink_ports: Vec<u16>,
    ) -> Self {
        Self {
            metrics_port,
            debug_port,
            console_port,
            custom_port,
            sink_ports,
        }
    }

    /// All assigned ports, named ports first.
    #[must_use]
    pub fn all(&self) -> Vec<u16> {
        let mut ports = vec![
            self.metrics_port,
            self.debug_port,
            self.console_port,
            self.custom_port,
        ];
        ports.extend(&self.sink_ports);
        ports
    }
}

/// Descriptor of a registered task executor, as known to the resource
/// cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskExecutorRegistration {
    /// The executor's identifier.
    pub task_executor_id: TaskExecutorId,
    /// Resource cluster the executor belongs to, if it advertises one.
    pub cluster_id: Option<ClusterId>,
    /// Hostname tasks on this executor are reachable at.
    pub hostname: String,
    /// Port block assigned to the worker being placed.
    pub ports: WorkerPorts,
    /// Resource shape the executor offers.
    pub machine: MachineDefinition,
}
