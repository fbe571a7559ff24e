use secrecy::{ExposeSecret, SecretString};

use crate::backends::ProviderClient;
use crate::error::LLMError;

use super::backend::Provider;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Builder for configuring and instantiating a provider client.
#[derive(Default)]
pub struct ClientBuilder {
    provider: Option<Provider>,
    api_key: Option<SecretString>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_seconds: Option<u64>,
}

impl ClientBuilder {
    /// Creates a new empty builder instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the provider to use.
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Sets the base URL for API requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model identifier to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = Some(timeout_seconds);
        self
    }

    /// Builds the client. Provider-specific option shaping is fixed here.
    pub fn build(mut self) -> Result<ProviderClient, LLMError> {
        let provider = self
            .provider
            .ok_or_else(|| LLMError::config("No provider specified"))?;
        log::debug!(
            "Building model client. provider={} model={:?} base_url={:?} timeout={:?}",
            provider,
            self.model,
            self.base_url,
            self.timeout_seconds,
        );
        let api_key = self.require_api_key(provider)?;
        let model = self
            .model
            .take()
            .unwrap_or_else(|| provider.default_model().to_string());
        let timeout = Some(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));
        match provider {
            Provider::OpenAI => build_openai(api_key, self.base_url.take(), model, timeout),
            Provider::Anthropic => build_anthropic(api_key, self.base_url.take(), model, timeout),
        }
    }

    fn require_api_key(&mut self, provider: Provider) -> Result<String, LLMError> {
        let key = self
            .api_key
            .take()
            .map(|key| key.expose_secret().trim().to_string())
            .unwrap_or_default();
        if key.is_empty() {
            return Err(LLMError::config(format!(
                "No API key provided for {provider}"
            )));
        }
        Ok(key)
    }
}

#[cfg(feature = "openai")]
fn build_openai(
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Option<u64>,
) -> Result<ProviderClient, LLMError> {
    let client = crate::backends::openai::OpenAI::new(api_key, base_url, model, timeout)?;
    Ok(ProviderClient::OpenAI(client))
}

#[cfg(not(feature = "openai"))]
fn build_openai(
    _api_key: String,
    _base_url: Option<String>,
    _model: String,
    _timeout: Option<u64>,
) -> Result<ProviderClient, LLMError> {
    Err(LLMError::config("OpenAI feature not enabled"))
}

#[cfg(feature = "anthropic")]
fn build_anthropic(
    api_key: String,
    base_url: Option<String>,
    model: String,
    timeout: Option<u64>,
) -> Result<ProviderClient, LLMError> {
    let client = crate::backends::anthropic::Anthropic::new(api_key, base_url, model, timeout)?;
    Ok(ProviderClient::Anthropic(client))
}

#[cfg(not(feature = "anthropic"))]
fn build_anthropic(
    _api_key: String,
    _base_url: Option<String>,
    _model: String,
    _timeout: Option<u64>,
) -> Result<ProviderClient, LLMError> {
    Err(LLMError::config("Anthropic feature not enabled"))
}

#[cfg(all(test, feature = "openai", feature = "anthropic"))]
mod tests {
    use super::*;
    use crate::client::ModelClient;

    #[test]
    fn missing_provider_fails_fast() {
        let err = ClientBuilder::new().api_key("k").build().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn blank_api_key_fails_fast() {
        let err = ClientBuilder::new()
            .provider(Provider::OpenAI)
            .api_key("   ")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("No API key provided for openai"));
    }

    #[test]
    fn builds_selected_variant_with_default_model() {
        let client = ClientBuilder::new()
            .provider(Provider::Anthropic)
            .api_key("sk-ant")
            .build()
            .unwrap();
        assert!(matches!(client, ProviderClient::Anthropic(_)));
        assert_eq!(client.describe(), "anthropic:claude-3-5-haiku-20241022");
    }
}
