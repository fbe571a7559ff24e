use llm_profile::builder::Provider;
use serde::{Deserialize, Serialize};

use super::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// The model under test.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: Provider,
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: Option<u64>,
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAI,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: None,
            base_url: None,
        }
    }
}
