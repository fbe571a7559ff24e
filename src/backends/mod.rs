//! Concrete model API clients behind the [`ModelClient`] capability.
//!
//! The set of providers is closed: [`ProviderClient`] holds one variant per
//! backend and is selected once, at construction, by
//! [`ClientBuilder`](crate::builder::ClientBuilder).

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "openai")]
pub mod openai;

mod http;

use async_trait::async_trait;

use crate::client::{GenerationOptions, ModelClient};
use crate::error::LLMError;

/// A configured client for one of the supported providers.
#[derive(Debug, Clone)]
pub enum ProviderClient {
    #[cfg(feature = "openai")]
    OpenAI(openai::OpenAI),
    #[cfg(feature = "anthropic")]
    Anthropic(anthropic::Anthropic),
}

#[async_trait]
impl ModelClient for ProviderClient {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LLMError> {
        match self {
            #[cfg(feature = "openai")]
            ProviderClient::OpenAI(client) => client.generate(prompt, options).await,
            #[cfg(feature = "anthropic")]
            ProviderClient::Anthropic(client) => client.generate(prompt, options).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            #[cfg(feature = "openai")]
            ProviderClient::OpenAI(client) => format!("openai:{}", client.model()),
            #[cfg(feature = "anthropic")]
            ProviderClient::Anthropic(client) => format!("anthropic:{}", client.model()),
        }
    }
}
