use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::client::{GenerationOptions, ModelClient};
use crate::error::LLMError;
use crate::evaluator::{EvaluationMethod, Evaluator, TaskKind};

use super::{Progress, ProgressSink, RunContext, TrialConfig, TrialRunner};

/// Echoes a fixed reply and records how many calls overlap.
struct EchoClient {
    reply: String,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

impl EchoClient {
    fn new(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ModelClient for EchoClient {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LLMError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    fn describe(&self) -> String {
        "echo".to_string()
    }
}

/// Fails every call whose sequence number satisfies `fails`.
struct FlakyClient {
    calls: AtomicUsize,
    fails: fn(usize) -> bool,
}

#[async_trait]
impl ModelClient for FlakyClient {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LLMError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if (self.fails)(call) {
            Err(LLMError::ProviderError("rate limited".into()))
        } else {
            Ok("Paris".to_string())
        }
    }
}

struct PanickingClient;

#[async_trait]
impl ModelClient for PanickingClient {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LLMError> {
        panic!("client exploded");
    }
}

struct FixedJudge(Result<String, ()>);

#[async_trait]
impl ModelClient for FixedJudge {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, LLMError> {
        self.0
            .clone()
            .map_err(|_| LLMError::HttpError("judge unreachable".into()))
    }
}

fn runner(client: Arc<dyn ModelClient>, evaluator: Evaluator, trials: usize, workers: usize) -> TrialRunner {
    let config = TrialConfig::new("What is the capital of France?", trials, workers);
    TrialRunner::new(RunContext::new(client, evaluator, config)).unwrap()
}

fn paris() -> Evaluator {
    Evaluator::algorithmic(TaskKind::StringMatch, "Paris")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_trial_is_recorded_once() {
    let client = EchoClient::new("Paris", Duration::from_millis(1));
    let outcome = runner(client.clone(), paris(), 20, 4).run().await;

    assert_eq!(outcome.metrics.records.len(), 20);
    assert!(outcome.report.all_succeeded());
    assert_eq!(outcome.report.succeeded, 20);
    assert_eq!(client.calls.load(Ordering::SeqCst), 20);

    let indices: HashSet<usize> = outcome.metrics.records.iter().map(|r| r.trial_index).collect();
    assert_eq!(indices, (0..20).collect());
    assert!(outcome.metrics.records.iter().all(|r| r.correct));
    assert_eq!(outcome.metrics.summary.success_rate, 1.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn in_flight_trials_never_exceed_concurrency() {
    let client = EchoClient::new("Paris", Duration::from_millis(20));
    let outcome = runner(client.clone(), paris(), 20, 3).run().await;

    assert_eq!(outcome.metrics.records.len(), 20);
    assert_eq!(client.max_in_flight.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_client_yields_empty_log() {
    let client = Arc::new(FlakyClient {
        calls: AtomicUsize::new(0),
        fails: |_| true,
    });
    let outcome = runner(client, paris(), 10, 3).run().await;

    assert!(outcome.metrics.records.is_empty());
    assert_eq!(outcome.metrics.summary.total, 0);
    assert_eq!(outcome.metrics.summary.success_rate, 0.0);
    assert_eq!(outcome.report.failed(), 10);
    let indices: Vec<usize> = outcome.report.failures.iter().map(|f| f.trial_index).collect();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
    assert!(outcome.report.failures[0].error.contains("rate limited"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn partial_failures_are_excluded_from_rate() {
    let client = Arc::new(FlakyClient {
        calls: AtomicUsize::new(0),
        fails: |call| call % 2 == 0,
    });
    let outcome = runner(client, paris(), 10, 2).run().await;

    assert_eq!(outcome.report.succeeded, 5);
    assert_eq!(outcome.report.failed(), 5);
    assert_eq!(outcome.metrics.records.len(), 5);
    assert_eq!(outcome.metrics.summary.success_rate, 1.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_client_counts_as_failure() {
    let outcome = runner(Arc::new(PanickingClient), paris(), 4, 2).run().await;

    assert!(outcome.metrics.records.is_empty());
    assert_eq!(outcome.report.failed(), 4);
    assert!(outcome
        .report
        .failures
        .iter()
        .all(|f| f.error.contains("client exploded")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn judge_error_drops_the_trial() {
    let evaluator = Evaluator::builder(TaskKind::StringMatch, "Paris")
        .method(EvaluationMethod::LlmJudge)
        .judge(Arc::new(FixedJudge(Err(()))))
        .build()
        .unwrap();
    let client = EchoClient::new("Paris", Duration::ZERO);
    let outcome = runner(client, evaluator, 3, 3).run().await;

    assert!(outcome.metrics.records.is_empty());
    assert_eq!(outcome.report.failed(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn affirmative_judge_marks_every_trial_correct() {
    let evaluator = Evaluator::builder(TaskKind::StringMatch, "Paris")
        .method(EvaluationMethod::LlmJudge)
        .judge(Arc::new(FixedJudge(Ok("Yes, matches.".into()))))
        .build()
        .unwrap();
    let client = EchoClient::new("Lyon", Duration::ZERO);
    let outcome = runner(client, evaluator, 5, 2).run().await;

    assert_eq!(outcome.metrics.records.len(), 5);
    assert!(outcome.metrics.records.iter().all(|r| r.correct));
    assert!(outcome.metrics.records.iter().all(|r| r.evaluation_log.is_empty()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn progress_is_monotonic_and_finishes() {
    let seen: Arc<Mutex<Vec<Progress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink: ProgressSink = {
        let seen = Arc::clone(&seen);
        Arc::new(move |progress| seen.lock().push(progress))
    };
    let client = EchoClient::new("Paris", Duration::from_millis(1));
    runner(client, paris(), 8, 3).with_progress(sink).run().await;

    let seen = seen.lock();
    let completed: Vec<usize> = seen.iter().map(|p| p.completed).collect();
    assert_eq!(completed, (1..=8).collect::<Vec<_>>());
    let last = seen.last().unwrap();
    assert!(last.is_finished());
    assert_eq!(last.fraction(), 1.0);
    assert_eq!(last.succeeded + last.failed, 8);
}

#[test]
fn zero_sized_runs_are_rejected_before_dispatch() {
    let client = EchoClient::new("Paris", Duration::ZERO);
    for (trials, workers) in [(0, 1), (1, 0)] {
        let config = TrialConfig::new("p", trials, workers);
        let err = TrialRunner::new(RunContext::new(client.clone(), paris(), config))
            .err()
            .unwrap();
        assert!(err.is_configuration());
    }
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn response_times_are_positive() {
    let client = EchoClient::new("Paris", Duration::from_millis(5));
    let rt = tokio::runtime::Runtime::new().unwrap();
    let outcome = rt.block_on(runner(client, paris(), 3, 3).run());
    assert!(outcome
        .metrics
        .records
        .iter()
        .all(|r| r.response_time >= Duration::from_millis(5)));
    assert!(outcome.metrics.summary.min_response_secs >= 0.005);
}
