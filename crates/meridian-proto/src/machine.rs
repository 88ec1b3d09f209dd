//! Resource shapes for worker placement.

use serde::{Deserialize, Serialize};

/// The resource shape a worker requires from its host.
///
/// Placement reserves a task executor whose advertised shape covers every
/// dimension of the requested one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    /// CPU cores.
    pub cpu_cores: f64,
    /// Memory in MB.
    pub memory_mb: f64,
    /// Disk in MB.
    pub disk_mb: f64,
    /// Network bandwidth in Mbps.
    pub network_mbps: f64,
    /// Number of ports the worker needs assigned.
    pub num_ports: u32,
}

impl MachineDefinition {
    /// Create a new machine definition.
    #[must_use]
    pub const fn new(
        cpu_cores: f64,
        memory_mb: f64,
        disk_mb: f64,
        network_mbps: f64,
        num_ports: u32,
    ) -> Self {
        Self {
            cpu_cores,
            memory_mb,
            disk_mb,
            network_mbps,
            num_ports,
        }
    }

    /// Returns true if this definition fits within `other` on every
    /// dimension.
    #[must_use]
    pub fn fits_within(&self, other: &Self) -> bool {
        self.cpu_cores <= other.cpu_cores
            && self.memory_mb <= other.memory_mb
            && self.disk_mb <= other.disk_mb
            && self.network_mbps <= other.network_mbps
            && self.num_ports <= other.num_ports
    }
}

impl Default for MachineDefinition {
    fn default() -> Self {
        Self {
            cpu_cores: 1.0,
            memory_mb: 1024.0,
            disk_mb: 1024.0,
            network_mbps: 128.0,
            num_ports: 1,
        }
    }
}
