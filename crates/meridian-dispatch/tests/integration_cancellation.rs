//! Integration tests for the cancellation pipeline.

mod common;

use common::{fixtures, within, TestEngine};
use meridian_proto::WorkerEvent;

#[tokio::test(start_paused = true)]
async fn cancel_reaches_the_hosting_executor() {
    let engine = TestEngine::new();
    let gateway = engine.add_executor("executor-1", "host-1", 7000);

    // No prior schedule: cancellation resolves the executor by hostname
    // alone.
    engine
        .handle
        .cancel(fixtures::worker("sine-function", 0), "host-1")
        .expect("cancel should succeed");

    within(gateway.wait_for_cancellations(1)).await;
    assert_eq!(gateway.cancelled(), vec![fixtures::worker("sine-function", 0)]);

    // Cancellation emits no worker lifecycle event.
    assert!(engine.router.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_failure_is_dropped_and_engine_stays_live() {
    let engine = TestEngine::new();
    let gateway = engine.add_executor("executor-1", "host-1", 7000);
    gateway.fail_next_cancellations(1);

    engine
        .handle
        .cancel(fixtures::worker("sine-function", 0), "host-1")
        .expect("cancel should succeed");

    // The failed cancellation is logged and dropped; a subsequent placement
    // on the same engine still completes.
    engine
        .handle
        .submit(fixtures::request("sine-function", 1))
        .expect("submit should succeed");

    let events = within(engine.router.wait_for_events(1)).await;
    assert!(matches!(events[0], WorkerEvent::Launched { .. }));
    assert!(gateway.cancelled().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancel_for_unknown_host_is_dropped() {
    let engine = TestEngine::new();
    engine.add_executor("executor-1", "host-1", 7000);

    engine
        .handle
        .cancel(fixtures::worker("sine-function", 0), "host-unknown")
        .expect("cancel should succeed");

    // The hostname lookup fails, the failure is dropped, and the engine
    // keeps serving.
    engine
        .handle
        .submit(fixtures::request("sine-function", 1))
        .expect("submit should succeed");

    let events = within(engine.router.wait_for_events(1)).await;
    assert!(matches!(events[0], WorkerEvent::Launched { .. }));
}

#[tokio::test(start_paused = true)]
async fn cancel_races_a_placement_independently() {
    let engine = TestEngine::new();
    let gateway = engine.add_executor("executor-1", "host-1", 7000);

    // A placement and a cancellation for the same worker proceed
    // independently; the executor is the arbiter of the race.
    engine
        .handle
        .submit(fixtures::request("sine-function", 0))
        .expect("submit should succeed");
    engine
        .handle
        .cancel(fixtures::worker("sine-function", 0), "host-1")
        .expect("cancel should succeed");

    let events = within(engine.router.wait_for_events(1)).await;
    assert!(matches!(events[0], WorkerEvent::Launched { .. }));

    within(gateway.wait_for_cancellations(1)).await;
    assert_eq!(gateway.cancelled(), vec![fixtures::worker("sine-function", 0)]);
}
