//! Anthropic messages API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::{GenerationOptions, ModelClient};
use crate::error::LLMError;

use super::http;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1/";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 256;
const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Configuration for the Anthropic client.
#[derive(Debug)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: reqwest::Url,
    pub model: String,
    pub timeout_seconds: Option<u64>,
}

/// Client for Anthropic's messages API.
#[derive(Debug, Clone)]
pub struct Anthropic {
    pub config: Arc<AnthropicConfig>,
    pub client: Client,
}

#[derive(Serialize, Debug)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct AnthropicCompleteRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct AnthropicCompleteResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContent {
    #[serde(rename = "type", default)]
    content_type: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicCompleteResponse {
    /// Joins all text blocks, skipping non-text content.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|block| block.content_type.as_deref().unwrap_or("text") == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

impl Anthropic {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, LLMError> {
        let client = http::build_http_client(timeout_seconds)?;
        Self::with_client(client, api_key, base_url, model, timeout_seconds)
    }

    pub fn with_client(
        client: Client,
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, LLMError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LLMError::AuthError("Missing Anthropic API key".to_string()));
        }
        let base_url = http::parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(Self {
            config: Arc::new(AnthropicConfig {
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

    /// Anthropic requires `max_tokens`; unset options fall back to defaults.
    fn request_body(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<serde_json::Value, LLMError> {
        let request = AnthropicCompleteRequest {
            model: &self.config.model,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        };
        let mut body = serde_json::to_value(request)?;
        http::merge_extra(&mut body, &options.extra);
        Ok(body)
    }
}

#[async_trait]
impl ModelClient for Anthropic {
    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, LLMError> {
        let body = self.request_body(prompt, options)?;
        let url = self
            .config
            .base_url
            .join("messages")
            .map_err(|e| LLMError::HttpError(e.to_string()))?;
        http::log_request_payload("Anthropic", &body);

        let mut request = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);
        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        let response = request.send().await?;
        let response = http::ensure_success_response(response, "Anthropic").await?;
        let parsed: AnthropicCompleteResponse = http::parse_json(response, "Anthropic").await?;
        Ok(parsed.text())
    }

    fn describe(&self) -> String {
        format!("anthropic:{}", self.config.model)
    }
}
