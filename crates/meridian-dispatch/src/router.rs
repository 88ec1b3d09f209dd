//! Outbound event routing to the job-management plane.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;

use meridian_proto::WorkerEvent;

/// Routes worker lifecycle events to the job-management plane.
///
/// Routing targets an in-process component and is expected to be infallible;
/// a `false` return indicates a programming error. The engine logs it and
/// does not retry.
pub trait JobMessageRouter: Send + Sync {
    /// Route one event. Returns whether the event was accepted.
    fn route_worker_event(&self, event: WorkerEvent) -> bool;
}

/// Mock router for testing.
///
/// Records every routed event and can be flipped to reject events.
#[derive(Default)]
pub struct MockRouter {
    events: Mutex<Vec<WorkerEvent>>,
    reject: AtomicBool,
    notify: Notify,
}

impl MockRouter {
    /// Create a router that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the router report routing failure from now on.
    pub fn reject_events(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// Events routed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<WorkerEvent> {
        self.events.lock().clone()
    }

    /// Wait until at least `count` events have been routed, returning them.
    pub async fn wait_for_events(&self, count: usize) -> Vec<WorkerEvent> {
        loop {
            let notified = self.notify.notified();
            {
                let events = self.events.lock();
                if events.len() >= count {
                    return events.clone();
                }
            }
            notified.await;
        }
    }
}

impl JobMessageRouter for MockRouter {
    fn route_worker_event(&self, event: WorkerEvent) -> bool {
        self.events.lock().push(event);
        self.notify.notify_one();
        !self.reject.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use meridian_proto::WorkerId;

    fn make_event() -> WorkerEvent {
        WorkerEvent::LaunchFailed {
            worker_id: WorkerId::new("job-1", 0, 1),
            stage_num: 0,
            cause: "no capacity".to_owned(),
        }
    }

    #[test]
    fn records_events_in_order() {
        let router = MockRouter::new();
        assert!(router.route_worker_event(make_event()));
        assert!(router.route_worker_event(make_event()));
        assert_eq!(router.events().len(), 2);
    }

    #[test]
    fn rejection_still_records() {
        let router = MockRouter::new();
        router.reject_events();
        assert!(!router.route_worker_event(make_event()));
        assert_eq!(router.events().len(), 1);
    }

    #[tokio::test]
    async fn wait_for_events_sees_past_events() {
        let router = MockRouter::new();
        router.route_worker_event(make_event());
        let events = router.wait_for_events(1).await;
        assert_eq!(events.len(), 1);
    }
}
