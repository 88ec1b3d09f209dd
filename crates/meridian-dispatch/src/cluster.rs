//! Resource cluster and task executor gateway seams.
//!
//! The engine never talks to cluster machinery directly; it consumes these
//! traits. Production wires in the real resource-cluster client and RPC
//! gateways; tests use the in-crate mocks.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use meridian_proto::{
    ExecuteStageRequest, MachineDefinition, TaskExecutorId, TaskExecutorRegistration, WorkerId,
};

use crate::error::{DispatchError, DispatchResult};

/// View of the resource cluster the dispatch engine consumes.
///
/// Implementations must be safe for concurrent use; the engine consults them
/// from async continuations as well as from the event loop.
#[async_trait]
pub trait ResourceCluster: Send + Sync {
    /// Reserve an executor whose registration satisfies `machine` for
    /// `worker_id`, or fail if none is currently available.
    async fn task_executor_for(
        &self,
        machine: &MachineDefinition,
        worker_id: &WorkerId,
    ) -> DispatchResult<TaskExecutorId>;

    /// Obtain the RPC gateway for an executor.
    async fn gateway(&self, id: &TaskExecutorId) -> DispatchResult<Arc<dyn TaskExecutorGateway>>;

    /// Look up the current registration of an executor.
    async fn registration(&self, id: &TaskExecutorId) -> DispatchResult<TaskExecutorRegistration>;

    /// Look up the current registration of the executor at `hostname`.
    async fn registration_by_host(
        &self,
        hostname: &str,
    ) -> DispatchResult<TaskExecutorRegistration>;
}

/// RPC surface of one task executor.
#[async_trait]
pub trait TaskExecutorGateway: Send + Sync {
    /// Hand the executor the payload required to launch a worker.
    async fn submit_task(&self, request: ExecuteStageRequest) -> DispatchResult<()>;

    /// Cancel the task of `worker_id` on this executor.
    ///
    /// The executor resolves races with a starting or never-submitted task by
    /// its normal task-lifecycle rules.
    async fn cancel_task(&self, worker_id: &WorkerId) -> DispatchResult<()>;
}

/// Mock resource cluster for testing.
///
/// Behaves as a tiny first-fit cluster over registered executors, with knobs
/// to script assignment failures and mutate registrations mid-flight.
#[derive(Default)]
pub struct MockResourceCluster {
    executors: DashMap<TaskExecutorId, ExecutorEntry>,
    fail_assignments: AtomicU32,
    assignment_log: Mutex<Vec<WorkerId>>,
}

struct ExecutorEntry {
    registration: TaskExecutorRegistration,
    gateway: Arc<MockGateway>,
    claimed: bool,
}

impl MockResourceCluster {
    /// Create an empty mock cluster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executor; returns its gateway for inspection.
    pub fn add_executor(&self, registration: TaskExecutorRegistration) -> Arc<MockGateway> {
        let gateway = Arc::new(MockGateway::default());
        self.executors.insert(
            registration.task_executor_id.clone(),
            ExecutorEntry {
                registration,
                gateway: Arc::clone(&gateway),
                claimed: false,
            },
        );
        gateway
    }

    /// Make the next `count` assignment calls fail with no capacity.
    pub fn fail_next_assignments(&self, count: u32) {
        self.fail_assignments.store(count, Ordering::SeqCst);
    }

    /// Update an executor's hostname, as a re-registration would.
    pub fn set_hostname(&self, id: &TaskExecutorId, hostname: &str) {
        if let Some(mut entry) = self.executors.get_mut(id) {
            entry.registration.hostname = hostname.to_owned();
        }
    }

    /// Worker IDs of every assignment call observed, in order.
    #[must_use]
    pub fn assignment_log(&self) -> Vec<WorkerId> {
        self.assignment_log.lock().clone()
    }

    /// Gateway of a registered executor.
    #[must_use]
    pub fn gateway_of(&self, id: &TaskExecutorId) -> Option<Arc<MockGateway>> {
        self.executors.get(id).map(|e| Arc::clone(&e.gateway))
    }
}

#[async_trait]
impl ResourceCluster for MockResourceCluster {
    async fn task_executor_for(
        &self,
        machine: &MachineDefinition,
        worker_id: &WorkerId,
    ) -> DispatchResult<TaskExecutorId> {
        self.assignment_log.lock().push(worker_id.clone());

        if self
            .fail_assignments
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DispatchError::assignment_unavailable(format!(
                "no executor for {worker_id}"
            )));
        }

        let candidates: Vec<TaskExecutorId> = self
            .executors
            .iter()
            .filter(|entry| !entry.claimed && machine.fits_within(&entry.registration.machine))
            .map(|entry| entry.key().clone())
            .collect();

        // Re-check under the entry lock: a concurrent assignment may have
        // claimed the candidate in the meantime.
        for id in candidates {
            if let Some(mut entry) = self.executors.get_mut(&id) {
                if !entry.claimed {
                    entry.claimed = true;
                    return Ok(id);
                }
            }
        }

        Err(DispatchError::assignment_unavailable(format!(
            "no executor fits {worker_id}"
        )))
    }

    async fn gateway(&self, id: &TaskExecutorId) -> DispatchResult<Arc<dyn TaskExecutorGateway>> {
        self.executors
            .get(id)
            .map(|e| Arc::clone(&e.gateway) as Arc<dyn TaskExecutorGateway>)
            .ok_or_else(|| DispatchError::lookup(format!("unknown executor: {id}")))
    }

    async fn registration(&self, id: &TaskExecutorId) -> DispatchResult<TaskExecutorRegistration> {
        self.executors
            .get(id)
            .map(|e| e.registration.clone())
            .ok_or_else(|| DispatchError::lookup(format!("unknown executor: {id}")))
    }

    async fn registration_by_host(
        &self,
        hostname: &str,
    ) -> DispatchResult<TaskExecutorRegistration> {
        self.executors
            .iter()
            .find(|e| e.registration.hostname == hostname)
            .map(|e| e.registration.clone())
            .ok_or_else(|| DispatchError::lookup(format!("no executor at host: {hostname}")))
    }
}

type SubmitHook = Box<dyn FnOnce() + Send>;

/// Mock task executor gateway for testing.
///
/// Records submissions and cancellations, with knobs to script failures and
/// to run a hook at submission time (e.g. to change a registration before the
/// ack is processed).
#[derive(Default)]
pub struct MockGateway {
    submitted: Mutex<Vec<ExecuteStageRequest>>,
    cancelled: Mutex<Vec<WorkerId>>,
    fail_submissions: AtomicU32,
    fail_cancellations: AtomicU32,
    on_submit: Mutex<Option<SubmitHook>>,
    activity: tokio::sync::Notify,
}

impl MockGateway {
    /// Make the next `count` submissions fail.
    pub fn fail_next_submissions(&self, count: u32) {
        self.fail_submissions.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` cancellations fail.
    pub fn fail_next_cancellations(&self, count: u32) {
        self.fail_cancellations.store(count, Ordering::SeqCst);
    }

    /// Run `hook` when the next submission arrives, before it is acked.
    pub fn on_next_submission(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_submit.lock() = Some(Box::new(hook));
    }

    /// Payloads submitted to this executor, in order.
    #[must_use]
    pub fn submitted(&self) -> Vec<ExecuteStageRequest> {
        self.submitted.lock().clone()
    }

    /// Workers whose cancellation reached this executor, in order.
    #[must_use]
    pub fn cancelled(&self) -> Vec<WorkerId> {
        self.cancelled.lock().clone()
    }

    /// Wait until at least `count` cancellations have been observed.
    pub async fn wait_for_cancellations(&self, count: usize) {
        loop {
            let notified = self.activity.notified();
            if self.cancelled.lock().len() >= count {
                return;
            }
            notified.await;
        }
    }

    fn take_one(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl TaskExecutorGateway for MockGateway {
    async fn submit_task(&self, request: ExecuteStageRequest) -> DispatchResult<()> {
        if let Some(hook) = self.on_submit.lock().take() {
            hook();
        }

        if Self::take_one(&self.fail_submissions) {
            self.activity.notify_one();
            return Err(DispatchError::submission_rejected(format!(
                "executor rejected {}",
                request.worker_id
            )));
        }

        self.submitted.lock().push(request);
        self.activity.notify_one();
        Ok(())
    }

    async fn cancel_task(&self, worker_id: &WorkerId) -> DispatchResult<()> {
        if Self::take_one(&self.fail_cancellations) {
            self.activity.notify_one();
            return Err(DispatchError::cancellation(format!(
                "executor failed to cancel {worker_id}"
            )));
        }

        self.cancelled.lock().push(worker_id.clone());
        self.activity.notify_one();
        Ok(())
    }
}
