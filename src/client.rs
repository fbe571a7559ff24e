//! The single text-generation capability the trial runner and the judge depend on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LLMError;

/// Provider-neutral generation parameters.
///
/// Each backend translates these into its own request body, so callers never
/// deal with per-provider naming (`max_tokens` vs `max_completion_tokens`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
    /// Additional provider-specific fields merged into the request body.
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Adds a raw field to the provider request body.
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Black-box text generation.
///
/// Implementations must be safe to call from many trial units at once; the
/// runner places no serialization around them.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> Result<String, LLMError>;

    /// Human readable identifier used in logs, e.g. `openai:gpt-4o`.
    fn describe(&self) -> String {
        "model-client".to_string()
    }
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for std::sync::Arc<T> {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LLMError> {
        (**self).generate(prompt, options).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_builder_sets_fields() {
        let opts = GenerationOptions::new()
            .temperature(0.2)
            .max_tokens(64)
            .extra("top_p", serde_json::json!(0.9));
        assert_eq!(opts.temperature, Some(0.2));
        assert_eq!(opts.max_tokens, Some(64));
        assert_eq!(opts.extra["top_p"], serde_json::json!(0.9));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: GenerationOptions = serde_json::from_str(r#"{"max_tokens": 10}"#).unwrap();
        assert_eq!(opts.max_tokens, Some(10));
        assert!(opts.temperature.is_none());
        assert!(opts.extra.is_empty());
    }
}
