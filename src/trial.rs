#[path = "trial/config.rs"]
mod config;

#[path = "trial/context.rs"]
mod context;

#[path = "trial/progress.rs"]
mod progress;

#[path = "trial/runner.rs"]
mod runner;

#[cfg(test)]
#[path = "trial/runner_tests.rs"]
mod runner_tests;

pub use config::TrialConfig;
pub use context::RunContext;
pub use progress::{progress_channel, Progress, ProgressSink};
pub use runner::{RunOutcome, RunReport, TrialFailure, TrialRunner};
