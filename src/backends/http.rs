use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LLMError;

/// Parses a base URL, making sure relative joins append to its path.
pub(super) fn parse_base_url(raw: &str) -> Result<reqwest::Url, LLMError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    reqwest::Url::parse(&raw)
        .map_err(|e| LLMError::Configuration(format!("Invalid base URL {raw}: {e}")))
}

pub(super) fn build_http_client(timeout_seconds: Option<u64>) -> Result<reqwest::Client, LLMError> {
    let mut builder = reqwest::Client::builder();
    if let Some(sec) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(sec));
    }
    Ok(builder.build()?)
}

pub(super) fn log_request_payload<T: Serialize>(label: &str, body: &T) {
    if !log::log_enabled!(log::Level::Trace) {
        return;
    }
    if let Ok(json) = serde_json::to_string(body) {
        log::trace!("{label} request payload: {json}");
    }
}

/// Maps a non-success status to the matching error variant, keeping the body.
pub(super) async fn ensure_success_response(
    response: reqwest::Response,
    context: &str,
) -> Result<reqwest::Response, LLMError> {
    log::debug!("{context} HTTP status: {}", response.status());
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await?;
    match status.as_u16() {
        401 | 403 => Err(LLMError::AuthError(format!(
            "{context} rejected credentials ({status}): {error_text}"
        ))),
        _ => Err(LLMError::ProviderError(format!(
            "{context} returned error status {status}: {error_text}"
        ))),
    }
}

pub(super) async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, LLMError> {
    let resp_text = response.text().await?;
    serde_json::from_str(&resp_text).map_err(|e| LLMError::ResponseFormatError {
        message: format!("Failed to decode {context} response: {e}"),
        raw_response: resp_text,
    })
}

/// Copies caller-supplied extra fields into a JSON request body without
/// overriding the fields the backend set itself.
pub(super) fn merge_extra(
    body: &mut serde_json::Value,
    extra: &serde_json::Map<String, serde_json::Value>,
) {
    if let serde_json::Value::Object(map) = body {
        for (key, value) in extra {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
}
