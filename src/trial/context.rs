use std::sync::Arc;

use crate::client::ModelClient;
use crate::evaluator::Evaluator;

use super::config::TrialConfig;

/// Everything a run needs, passed explicitly to the runner.
///
/// All members are read-only and shared by the trial units through `Arc`.
#[derive(Clone)]
pub struct RunContext {
    pub client: Arc<dyn ModelClient>,
    pub evaluator: Arc<Evaluator>,
    pub config: Arc<TrialConfig>,
}

impl RunContext {
    pub fn new(client: Arc<dyn ModelClient>, evaluator: Evaluator, config: TrialConfig) -> Self {
        Self {
            client,
            evaluator: Arc::new(evaluator),
            config: Arc::new(config),
        }
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("client", &self.client.describe())
            .field("evaluator", &self.evaluator)
            .field("config", &self.config)
            .finish()
    }
}
