use thiserror::Error;

/// Error types that can occur while configuring or running a benchmark.
#[derive(Debug, Error)]
pub enum LLMError {
    /// Invalid run, evaluator or provider configuration. Raised before any trial runs.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Errors returned by the LLM provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// A single trial unit failed; never escapes the runner
    #[error("Trial {trial_index} failed: {message}")]
    Trial { trial_index: usize, message: String },
    /// Filesystem errors from the credential store or exporters
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// CSV writer errors
    #[error("CSV error: {0}")]
    Csv(String),
}

impl LLMError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        LLMError::Configuration(message.into())
    }

    /// Returns true for errors that must stop a run before it starts.
    pub fn is_configuration(&self) -> bool {
        matches!(self, LLMError::Configuration(_))
    }
}

/// Converts reqwest HTTP errors into LlmErrors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                LLMError::AuthError(err.to_string())
            }
            _ => LLMError::HttpError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        LLMError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

impl From<csv::Error> for LLMError {
    fn from(err: csv::Error) -> Self {
        LLMError::Csv(err.to_string())
    }
}
