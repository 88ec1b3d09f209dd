//! The dispatch engine: a single-consumer event loop that places stage
//! workers onto task executors.
//!
//! All state transitions for all in-flight requests are serialised through
//! one mailbox. Handlers run to completion without awaiting remote I/O; every
//! remote call happens in a spawned continuation whose outcome is posted back
//! to the mailbox as another [`DispatchEvent`]. Per-worker ordering follows
//! from this shape: only one pipeline step can be in flight for a given
//! worker, because each step is produced by the previous step's continuation.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use meridian_proto::{
    ExecuteStageRequest, ScheduleRequest, TaskExecutorId, WorkerEvent, WorkerId,
};

use crate::cluster::ResourceCluster;
use crate::config::DispatchConfig;
use crate::error::{error_chain_string, DispatchError, DispatchResult};
use crate::event::{DispatchEvent, ScheduleAttempt};
use crate::router::JobMessageRouter;
use crate::timer::{Timer, TokioTimer};

/// Builder for a running dispatch engine.
pub struct DispatchEngine {
    cluster: Arc<dyn ResourceCluster>,
    router: Arc<dyn JobMessageRouter>,
    timer: Arc<dyn Timer>,
    config: DispatchConfig,
}

impl DispatchEngine {
    /// Create an engine over the given collaborators.
    #[must_use]
    pub fn new(
        cluster: Arc<dyn ResourceCluster>,
        router: Arc<dyn JobMessageRouter>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            cluster,
            router,
            timer: Arc::new(TokioTimer),
            config,
        }
    }

    /// Replace the retry timer.
    #[must_use]
    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    /// Spawn the event loop and return a handle for submitting work.
    #[must_use]
    pub fn start(self) -> DispatchHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let inner = Arc::new(Inner {
            cluster: self.cluster,
            router: self.router,
            timer: self.timer,
            config: self.config,
            mailbox: tx.clone(),
        });

        tokio::spawn(run(rx, inner, shutdown.clone()));

        DispatchHandle {
            mailbox: tx,
            shutdown,
        }
    }
}

impl fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchEngine").finish_non_exhaustive()
    }
}

/// Handle to a running dispatch engine.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    mailbox: mpsc::UnboundedSender<DispatchEvent>,
    shutdown: CancellationToken,
}

impl DispatchHandle {
    /// Submit a request for placement.
    pub fn submit(&self, request: ScheduleRequest) -> DispatchResult<()> {
        self.send(DispatchEvent::Schedule(ScheduleAttempt::first(request)))
    }

    /// Cancel the task of `worker_id` on the executor at `hostname`.
    ///
    /// Cancellation is independent of any placement in flight for the same
    /// worker; a race is resolved at the executor.
    pub fn cancel(&self, worker_id: WorkerId, hostname: impl Into<String>) -> DispatchResult<()> {
        self.send(DispatchEvent::Cancel {
            worker_id,
            hostname: hostname.into(),
        })
    }

    /// Stop the event loop. Already-spawned continuations finish but their
    /// results are dropped.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    fn send(&self, event: DispatchEvent) -> DispatchResult<()> {
        if self.shutdown.is_cancelled() {
            return Err(DispatchError::Stopped);
        }
        self.mailbox.send(event).map_err(|_| DispatchError::Stopped)
    }
}

async fn run(
    mut mailbox: mpsc::UnboundedReceiver<DispatchEvent>,
    inner: Arc<Inner>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            event = mailbox.recv() => match event {
                Some(event) => inner.handle(event),
                None => break,
            },
        }
    }
    debug!("dispatch engine stopped");
}

struct Inner {
    cluster: Arc<dyn ResourceCluster>,
    router: Arc<dyn JobMessageRouter>,
    timer: Arc<dyn Timer>,
    config: DispatchConfig,
    mailbox: mpsc::UnboundedSender<DispatchEvent>,
}

impl Inner {
    fn handle(self: &Arc<Self>, event: DispatchEvent) {
        match event {
            DispatchEvent::Schedule(attempt) => self.on_schedule(attempt),
            DispatchEvent::Cancel {
                worker_id,
                hostname,
            } => self.on_cancel(worker_id, hostname),
            DispatchEvent::Assigned { request, executor } => self.on_assigned(request, executor),
            DispatchEvent::AssignFailed { attempt, cause } => {
                self.on_assign_failed(attempt, cause);
            }
            DispatchEvent::Submitted { request, executor } => self.on_submitted(request, executor),
            DispatchEvent::SubmitFailed {
                request,
                executor,
                cause,
            } => self.on_submit_failed(&request, &executor, &cause),
            DispatchEvent::Noop => {}
        }
    }

    /// Ask the resource cluster to reserve an executor for this attempt.
    fn on_schedule(self: &Arc<Self>, attempt: ScheduleAttempt) {
        if attempt.is_retry() {
            info!(
                worker_id = %attempt.request.worker_id,
                attempt = attempt.attempt,
                previous_failure = attempt.previous_failure.as_deref(),
                "retrying schedule request"
            );
        }

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = inner
                .cluster
                .task_executor_for(
                    &attempt.request.machine_definition,
                    &attempt.request.worker_id,
                )
                .await;

            let event = match outcome {
                Ok(executor) => DispatchEvent::Assigned {
                    request: attempt.request,
                    executor,
                },
                Err(cause) => attempt.on_failure(cause),
            };
            inner.post(event);
        });
    }

    /// Resolve the assigned executor's gateway and registration, then submit
    /// the stage payload to it.
    fn on_assigned(self: &Arc<Self>, request: ScheduleRequest, executor: TaskExecutorId) {
        debug!(
            worker_id = %request.worker_id,
            executor = %executor,
            "executor assigned, submitting task"
        );

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = inner.submit_to_executor(&request, &executor).await;

            let event = match outcome {
                Ok(()) => DispatchEvent::Submitted { request, executor },
                Err(cause) => DispatchEvent::SubmitFailed {
                    request,
                    executor,
                    cause,
                },
            };
            inner.post(event);
        });
    }

    async fn submit_to_executor(
        &self,
        request: &ScheduleRequest,
        executor: &TaskExecutorId,
    ) -> DispatchResult<()> {
        let gateway = self.cluster.gateway(executor).await?;
        let registration = self.cluster.registration(executor).await?;
        let payload = ExecuteStageRequest::of(request, &registration);
        gateway.submit_task(payload).await
    }

    /// Publish the launch upstream, reading the executor's current
    /// registration as the source of truth for host and ports.
    fn on_submitted(self: &Arc<Self>, request: ScheduleRequest, executor: TaskExecutorId) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            match inner.cluster.registration(&executor).await {
                Ok(registration) => {
                    info!(
                        worker_id = %request.worker_id,
                        executor = %executor,
                        hostname = %registration.hostname,
                        "worker launched"
                    );
                    inner.publish(WorkerEvent::Launched {
                        worker_id: request.worker_id,
                        stage_num: request.stage_num,
                        hostname: registration.hostname,
                        resource_id: executor.resource_id().to_owned(),
                        cluster_resource_id: registration.cluster_id.map(|c| c.to_string()),
                        ports: registration.ports,
                    });
                }
                Err(cause) => {
                    error!(
                        worker_id = %request.worker_id,
                        executor = %executor,
                        error = %cause,
                        "lost the executor registration after submission"
                    );
                    inner.publish(WorkerEvent::LaunchFailed {
                        worker_id: request.worker_id,
                        stage_num: request.stage_num,
                        cause: error_chain_string(&cause),
                    });
                }
            }
        });
    }

    /// Schedule a delayed retry, unless the attempt cap is exhausted.
    fn on_assign_failed(&self, attempt: ScheduleAttempt, cause: DispatchError) {
        if let Some(cap) = self.config.max_attempts {
            if attempt.attempt >= cap {
                warn!(
                    worker_id = %attempt.request.worker_id,
                    attempts = attempt.attempt,
                    error = %cause,
                    "assignment attempts exhausted"
                );
                self.publish(WorkerEvent::LaunchFailed {
                    worker_id: attempt.request.worker_id.clone(),
                    stage_num: attempt.request.stage_num,
                    cause: error_chain_string(&cause),
                });
                return;
            }
        }

        error!(
            worker_id = %attempt.request.worker_id,
            attempt = attempt.attempt,
            error = %cause,
            delay = ?self.config.retry_delay,
            "failed to assign an executor, retrying"
        );

        let mailbox = self.mailbox.clone();
        let retry = attempt.on_retry(&cause);
        self.timer.schedule_once(
            self.config.retry_delay,
            Box::new(move || {
                let _ = mailbox.send(DispatchEvent::Schedule(retry));
            }),
        );
    }

    /// Surface a terminal submission failure upstream. The job-management
    /// plane owns any further re-driving.
    fn on_submit_failed(
        &self,
        request: &ScheduleRequest,
        executor: &TaskExecutorId,
        cause: &DispatchError,
    ) {
        error!(
            worker_id = %request.worker_id,
            executor = %executor,
            error = %cause,
            "task submission failed"
        );
        self.publish(WorkerEvent::LaunchFailed {
            worker_id: request.worker_id.clone(),
            stage_num: request.stage_num,
            cause: error_chain_string(cause),
        });
    }

    /// Resolve the hosting executor by hostname and cancel the worker's task
    /// on it. Failures are logged and dropped; no lifecycle event is emitted
    /// either way.
    fn on_cancel(self: &Arc<Self>, worker_id: WorkerId, hostname: String) {
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(cause) = inner.cancel_on_executor(&worker_id, &hostname).await {
                warn!(
                    worker_id = %worker_id,
                    hostname = %hostname,
                    error = %cause,
                    "failed to cancel worker task"
                );
            }
            inner.post(DispatchEvent::Noop);
        });
    }

    async fn cancel_on_executor(&self, worker_id: &WorkerId, hostname: &str) -> DispatchResult<()> {
        let registration = self.cluster.registration_by_host(hostname).await?;
        let gateway = self.cluster.gateway(&registration.task_executor_id).await?;
        gateway.cancel_task(worker_id).await
    }

    fn publish(&self, event: WorkerEvent) {
        let worker_id = event.worker_id().clone();
        if !self.router.route_worker_event(event) {
            error!(
                worker_id = %worker_id,
                "job message router rejected a worker event; this was never expected to fail"
            );
        }
    }

    fn post(&self, event: DispatchEvent) {
        // A closed mailbox means the engine stopped; the continuation's
        // outcome is intentionally dropped.
        let _ = self.mailbox.send(event);
    }
}
