use serde::{Deserialize, Serialize};

use crate::client::GenerationOptions;
use crate::error::LLMError;

/// Settings for one benchmark run. Immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Prompt sent, unchanged, to every trial.
    pub prompt: String,
    /// Generation parameters passed through to the model client.
    #[serde(default)]
    pub options: GenerationOptions,
    /// Number of independent trials to schedule.
    pub trial_count: usize,
    /// Maximum number of trials in flight at once.
    pub concurrency: usize,
}

impl TrialConfig {
    pub fn new(prompt: impl Into<String>, trial_count: usize, concurrency: usize) -> Self {
        Self {
            prompt: prompt.into(),
            options: GenerationOptions::default(),
            trial_count,
            concurrency,
        }
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Rejects run sizes that could never make progress.
    pub fn validate(&self) -> Result<(), LLMError> {
        if self.trial_count == 0 {
            return Err(LLMError::config("trial_count must be at least 1"));
        }
        if self.concurrency == 0 {
            return Err(LLMError::config("concurrency must be at least 1"));
        }
        if self.concurrency > self.trial_count {
            log::debug!(
                "concurrency {} exceeds trial_count {}; only {} workers will be busy",
                self.concurrency,
                self.trial_count,
                self.trial_count
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(TrialConfig::new("p", 0, 1).validate().unwrap_err().is_configuration());
        assert!(TrialConfig::new("p", 1, 0).validate().unwrap_err().is_configuration());
    }

    #[test]
    fn concurrency_above_trial_count_is_allowed() {
        assert!(TrialConfig::new("p", 2, 10).validate().is_ok());
    }
}
