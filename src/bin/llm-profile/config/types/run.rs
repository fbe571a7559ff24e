use serde::{Deserialize, Serialize};

use super::{DEFAULT_TRIALS, DEFAULT_WORKERS};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    pub prompt: Option<String>,
    pub trials: usize,
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prompt: None,
            trials: DEFAULT_TRIALS,
            workers: DEFAULT_WORKERS,
        }
    }
}
