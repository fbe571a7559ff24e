//! OpenAI API client.
//!
//! Chat models go through `chat/completions`; the few legacy instruct models
//! still only served by `completions` are routed there instead.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::{GenerationOptions, ModelClient};
use crate::error::LLMError;

use super::http;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const LEGACY_COMPLETION_PREFIXES: &[&str] = &["gpt-3.5-turbo-instruct", "davinci", "babbage"];

/// Configuration for the OpenAI client.
#[derive(Debug)]
pub struct OpenAIConfig {
    /// API key for authentication with OpenAI.
    pub api_key: String,
    /// Base URL for API requests.
    pub base_url: reqwest::Url,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for OpenAI's API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub config: Arc<OpenAIConfig>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
struct OpenAIChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAIChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize, Debug)]
struct OpenAICompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChatChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatChoice {
    message: OpenAIChatMsg,
}

#[derive(Deserialize, Debug)]
struct OpenAIChatMsg {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenAICompletionResponse {
    choices: Vec<OpenAICompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAICompletionChoice {
    text: String,
}

/// Which OpenAI endpoint serves a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIEndpoint {
    Chat,
    Completion,
}

impl OpenAIEndpoint {
    pub fn for_model(model: &str) -> Self {
        if LEGACY_COMPLETION_PREFIXES
            .iter()
            .any(|prefix| model.starts_with(prefix))
        {
            OpenAIEndpoint::Completion
        } else {
            OpenAIEndpoint::Chat
        }
    }
}

impl OpenAI {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, LLMError> {
        let client = http::build_http_client(timeout_seconds)?;
        Self::with_client(client, api_key, base_url, model, timeout_seconds)
    }

    /// Creates a new OpenAI client with a custom HTTP client.
    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, LLMError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LLMError::AuthError("Missing OpenAI API key".to_string()));
        }
        let base_url = http::parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(Self {
            config: Arc::new(OpenAIConfig {
                api_key,
                base_url,
                model: model.into(),
                timeout_seconds,
            }),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn base_url(&self) -> &reqwest::Url {
        &self.config.base_url
    }

    pub fn endpoint(&self) -> OpenAIEndpoint {
        OpenAIEndpoint::for_model(&self.config.model)
    }

    /// Translates neutral options into a chat request body.
    fn chat_body(&self, prompt: &str, options: &GenerationOptions) -> Result<serde_json::Value, LLMError> {
        let request = OpenAIChatRequest {
            model: &self.config.model,
            messages: vec![OpenAIChatMessage {
                role: "user",
                content: prompt,
            }],
            max_completion_tokens: options.max_tokens,
            temperature: options.temperature,
        };
        let mut body = serde_json::to_value(request)?;
        http::merge_extra(&mut body, &options.extra);
        Ok(body)
    }

    /// Translates neutral options into a legacy completion request body.
    fn completion_body(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<serde_json::Value, LLMError> {
        let request = OpenAICompletionRequest {
            model: &self.config.model,
            prompt,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };
        let mut body = serde_json::to_value(request)?;
        http::merge_extra(&mut body, &options.extra);
        Ok(body)
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<reqwest::Response, LLMError> {
        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| LLMError::HttpError(e.to_string()))?;
        http::log_request_payload("OpenAI", body);
        let mut request = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(body);
        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }
        let response = request.send().await?;
        http::ensure_success_response(response, "OpenAI").await
    }

    async fn generate_chat(&self, prompt: &str, options: &GenerationOptions) -> Result<String, LLMError> {
        let body = self.chat_body(prompt, options)?;
        let response = self.post("chat/completions", &body).await?;
        let parsed: OpenAIChatResponse = http::parse_json(response, "OpenAI chat").await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        if content.is_empty() {
            log::warn!("Received empty response from OpenAI model {}", self.config.model);
        }
        Ok(content.trim().to_string())
    }

    async fn generate_completion(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LLMError> {
        let body = self.completion_body(prompt, options)?;
        let response = self.post("completions", &body).await?;
        let parsed: OpenAICompletionResponse =
            http::parse_json(response, "OpenAI completion").await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text.trim().to_string())
            .ok_or_else(|| LLMError::ProviderError("OpenAI returned no choices".to_string()))
    }
}

#[async_trait]
impl ModelClient for OpenAI {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LLMError> {
        match self.endpoint() {
            OpenAIEndpoint::Chat => self.generate_chat(prompt, options).await,
            OpenAIEndpoint::Completion => self.generate_completion(prompt, options).await,
        }
    }

    fn describe(&self) -> String {
        format!("openai:{}", self.config.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard, model: &str) -> OpenAI {
        OpenAI::new("sk-test", Some(server.url()), model, Some(5)).unwrap()
    }

    #[test]
    fn endpoint_routing() {
        assert_eq!(OpenAIEndpoint::for_model("gpt-4o"), OpenAIEndpoint::Chat);
        assert_eq!(OpenAIEndpoint::for_model("o3-mini"), OpenAIEndpoint::Chat);
        assert_eq!(
            OpenAIEndpoint::for_model("gpt-3.5-turbo-instruct"),
            OpenAIEndpoint::Completion
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            OpenAI::new("", None, "gpt-4o", None),
            Err(LLMError::AuthError(_))
        ));
    }

    #[test]
    fn chat_body_uses_max_completion_tokens() {
        let client = OpenAI::new("sk", None, "gpt-4o", None).unwrap();
        let opts = GenerationOptions::new().temperature(0.5).max_tokens(150);
        let body = client.chat_body("hi", &opts).unwrap();
        assert_eq!(body["max_completion_tokens"], 150);
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["messages"][0]["content"], "hi");
    }

    #[tokio::test]
    async fn chat_generation_trims_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o",
                "max_completion_tokens": 20
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"  Paris \n"}}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, "gpt-4o");
        let text = client
            .generate("capital?", &GenerationOptions::new().max_tokens(20))
            .await
            .unwrap();
        assert_eq!(text, "Paris");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn completion_generation_uses_legacy_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({"max_tokens": 5})))
            .with_status(200)
            .with_body(r#"{"choices":[{"text":" ok "}]}"#)
            .create_async()
            .await;

        let client = client_for(&server, "gpt-3.5-turbo-instruct");
        let text = client
            .generate("p", &GenerationOptions::new().max_tokens(5))
            .await
            .unwrap();
        assert_eq!(text, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let err = client_for(&server, "gpt-4o")
            .generate("p", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::AuthError(_)));
    }

    #[tokio::test]
    async fn rate_limit_maps_to_provider_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let err = client_for(&server, "gpt-4o")
            .generate("p", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LLMError::ProviderError(msg) if msg.contains("slow down")));
    }
}
