use std::sync::Arc;

use tokio::sync::watch;

/// Snapshot emitted after each trial completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Trials finished so far, successful or not. Monotonically increasing.
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Completed share of the run, in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.completed >= self.total
    }
}

/// Caller-supplied progress callback. Invoked from the joining task, so it
/// must return quickly.
pub type ProgressSink = Arc<dyn Fn(Progress) + Send + Sync>;

/// A sink that publishes into a watch channel, for callers that prefer to
/// poll or await progress instead of handling callbacks.
pub fn progress_channel(total: usize) -> (ProgressSink, watch::Receiver<Progress>) {
    let (tx, rx) = watch::channel(Progress::new(total));
    let sink: ProgressSink = Arc::new(move |progress| {
        let _ = tx.send(progress);
    });
    (sink, rx)
}
