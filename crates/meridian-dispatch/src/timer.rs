//! Delayed-action scheduling for assignment retries.

use std::time::Duration;

/// Schedules a one-shot action after a delay.
///
/// The engine uses this for assignment retries only; it never blocks the
/// event loop on the delay.
pub trait Timer: Send + Sync {
    /// Run `action` once `delay` has elapsed.
    fn schedule_once(&self, delay: Duration, action: Box<dyn FnOnce() + Send>);
}

/// Wall-clock timer backed by the tokio runtime.
///
/// Under a paused-clock test runtime the delay follows tokio's virtual time,
/// so retry paths are testable without real waits.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioTimer;

impl Timer for TokioTimer {
    fn schedule_once(&self, delay: Duration, action: Box<dyn FnOnce() + Send>) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        });
    }
}
