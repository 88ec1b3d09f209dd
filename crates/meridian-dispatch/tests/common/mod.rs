//! Common test utilities for dispatch engine integration tests.

pub mod fixtures;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use meridian_dispatch::{
    DispatchConfig, DispatchEngine, DispatchHandle, JobMessageRouter, MockGateway,
    MockResourceCluster, MockRouter, ResourceCluster,
};

/// Complete test engine setup with mock collaborators wired together.
pub struct TestEngine {
    pub cluster: Arc<MockResourceCluster>,
    pub router: Arc<MockRouter>,
    pub handle: DispatchHandle,
}

impl TestEngine {
    /// Creates a running engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    /// Creates a running engine with custom configuration.
    pub fn with_config(config: DispatchConfig) -> Self {
        let cluster = Arc::new(MockResourceCluster::new());
        let router = Arc::new(MockRouter::new());
        let handle = DispatchEngine::new(
            Arc::clone(&cluster) as Arc<dyn ResourceCluster>,
            Arc::clone(&router) as Arc<dyn JobMessageRouter>,
            config,
        )
        .start();

        Self {
            cluster,
            router,
            handle,
        }
    }

    /// Registers an executor with the standard test shape.
    pub fn add_executor(&self, id: &str, hostname: &str, base_port: u16) -> Arc<MockGateway> {
        self.cluster
            .add_executor(fixtures::registration(id, hostname, base_port))
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Awaits `future` under a generous virtual-time bound.
///
/// Tests run on a paused clock, so a healthy pipeline resolves immediately
/// and a stuck one fails fast instead of hanging the suite. The bound is far
/// above the engine's retry delay so pending retries always fire first.
pub async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(600), future)
        .await
        .expect("timed out waiting for engine progress")
}
