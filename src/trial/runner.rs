use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::LLMError;
use crate::metrics::{MetricsExport, MetricsLog, TrialResult};

use super::context::RunContext;
use super::progress::{Progress, ProgressSink};

/// A trial unit that produced no result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialFailure {
    pub trial_index: usize,
    pub error: String,
}

/// Final tally of a run. Failed units are excluded from the metrics and
/// reported here instead.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<TrialFailure>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for RunReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} trials completed ({} failed) in {:.2}s",
            self.succeeded,
            self.total,
            self.failed(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Records and tally from a finished run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub metrics: MetricsExport,
    pub report: RunReport,
}

/// Runs `trial_count` generate-evaluate-log units with at most `concurrency`
/// of them in flight.
pub struct TrialRunner {
    context: RunContext,
    progress: Option<ProgressSink>,
}

impl TrialRunner {
    /// Validates the run configuration; nothing is dispatched on error.
    pub fn new(context: RunContext) -> Result<Self, LLMError> {
        context.config.validate()?;
        Ok(Self {
            context,
            progress: None,
        })
    }

    /// Sets a callback invoked after every completed unit.
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Dispatches every trial and waits for all of them. Per-trial errors are
    /// logged and tallied, never returned.
    pub async fn run(&self) -> RunOutcome {
        let started = Instant::now();
        let started_at = Utc::now();
        let total = self.context.config.trial_count;
        let semaphore = Arc::new(Semaphore::new(self.context.config.concurrency));
        let metrics_log = Arc::new(MetricsLog::with_capacity(total));
        let mut join_set = JoinSet::new();

        log::info!(
            "Starting {} trials against {} with {} workers",
            total,
            self.context.client.describe(),
            self.context.config.concurrency
        );

        for trial_index in 0..total {
            let context = self.context.clone();
            let metrics_log = Arc::clone(&metrics_log);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (trial_index, Err(trial_error(trial_index, "worker pool closed")));
                };
                let result = AssertUnwindSafe(run_trial(trial_index, &context, &metrics_log))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| Err(trial_error(trial_index, panic_message(&*panic))));
                (trial_index, result)
            });
        }

        let mut progress = Progress::new(total);
        let mut report = RunReport {
            started_at,
            total,
            ..RunReport::default()
        };
        let mut reported = HashSet::with_capacity(total);
        let mut unattributed = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((trial_index, Ok(()))) => {
                    reported.insert(trial_index);
                    report.succeeded += 1;
                    progress.succeeded += 1;
                }
                Ok((trial_index, Err(err))) => {
                    log::error!("Error during trial {trial_index}: {err}");
                    reported.insert(trial_index);
                    report.failures.push(TrialFailure {
                        trial_index,
                        error: err.to_string(),
                    });
                    progress.failed += 1;
                }
                Err(join_err) => {
                    log::error!("Trial task aborted: {join_err}");
                    unattributed.push(join_err.to_string());
                    progress.failed += 1;
                }
            }
            progress.completed += 1;
            if let Some(sink) = &self.progress {
                sink(progress);
            }
        }

        let missing = (0..total).filter(|index| !reported.contains(index));
        for (trial_index, error) in missing.zip(unattributed) {
            report.failures.push(TrialFailure { trial_index, error });
        }
        report.failures.sort_by_key(|failure| failure.trial_index);
        report.elapsed = started.elapsed();

        let metrics = match Arc::try_unwrap(metrics_log) {
            Ok(metrics_log) => metrics_log.into_export(),
            Err(shared) => shared.export(),
        };
        log::info!("{report}");
        RunOutcome { metrics, report }
    }
}

/// One unit: generate, time it, evaluate, append.
async fn run_trial(
    trial_index: usize,
    context: &RunContext,
    metrics_log: &MetricsLog,
) -> Result<(), LLMError> {
    let config = &context.config;
    let start = Instant::now();
    let response = context
        .client
        .generate(&config.prompt, &config.options)
        .await?;
    let response_time = start.elapsed();

    let outcome = context.evaluator.evaluate(&response).await?;
    log::debug!(
        "Trial {trial_index} finished in {:.3}s, correct={}",
        response_time.as_secs_f64(),
        outcome.passed
    );

    metrics_log.append(TrialResult {
        trial_index,
        correct: outcome.passed,
        response_time,
        response_text: response,
        expected_output: context.evaluator.expected_output().to_string(),
        evaluation_log: outcome.diagnostic,
    });
    Ok(())
}

fn trial_error(trial_index: usize, message: impl Into<String>) -> LLMError {
    LLMError::Trial {
        trial_index,
        message: message.into(),
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}
