//! Progress reporting hooks for long-running registrations.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, info};

/// Snapshot of optimizer state at one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Iteration number within the current level, starting at 1.
    pub iteration: usize,
    /// Metric value at this iteration.
    pub metric_value: f64,
    /// Current optimizer step length (or search radius).
    pub step_length: f64,
    /// Time elapsed since optimization started.
    pub elapsed: Duration,
}

/// Observer of registration progress.
///
/// Callbacks must be cheap; they run inline with the optimizer loop.
pub trait ProgressCallback: Send + Sync {
    /// Optimization is about to start.
    fn on_start(&self) {}

    /// One optimizer iteration finished.
    fn on_iteration(&self, info: &ProgressInfo);

    /// Optimization completed normally.
    fn on_complete(&self) {}

    /// Optimization aborted with an error.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// Logs progress through `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleProgressCallback;

impl ConsoleProgressCallback {
    pub fn new() -> Self {
        Self
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_start(&self) {
        info!("optimization started");
    }

    fn on_iteration(&self, info: &ProgressInfo) {
        info!(
            iteration = info.iteration,
            metric = info.metric_value,
            step = info.step_length,
            "optimizer iteration"
        );
    }

    fn on_complete(&self) {
        info!("optimization complete");
    }

    fn on_error(&self, message: &str) {
        error!(message, "optimization failed");
    }
}

/// Records every iteration for later inspection, e.g. convergence plots
/// or tests.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
}

impl HistoryCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the recorded iterations.
    pub fn history(&self) -> Vec<ProgressInfo> {
        self.history.lock().expect("history lock poisoned").clone()
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_iteration(&self, info: &ProgressInfo) {
        self.history
            .lock()
            .expect("history lock poisoned")
            .push(info.clone());
    }
}
