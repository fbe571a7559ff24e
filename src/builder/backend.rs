use serde::{Deserialize, Serialize};

use crate::error::LLMError;

const OPENAI_MODELS: &[&str] = &[
    "gpt-4.5-preview",
    "gpt-4.5-preview-2025-02-27",
    "o1",
    "o1-mini",
    "o3-mini",
    "o1-mini-2024-09-12",
    "o1-preview-2024-09-12",
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
];

const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-7-sonnet-20250219",
    "claude-3-5-sonnet-20241022",
    "claude-3-5-haiku-20241022",
];

/// Supported model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAI, Provider::Anthropic];

    /// Lowercase name used in config files and credential records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Environment variable consulted when no stored key exists.
    pub fn env_key(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Known model identifiers, newest first.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAI => OPENAI_MODELS,
            Provider::Anthropic => ANTHROPIC_MODELS,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-haiku-20241022",
        }
    }

    /// Credential record key holding a dedicated judge API key.
    pub fn judge_key_name(&self) -> String {
        format!("evaluator_{}", self.as_str())
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            _ => Err(LLMError::Configuration(format!("Unknown provider: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("openai", Provider::OpenAI)]
    #[case("OpenAI", Provider::OpenAI)]
    #[case(" anthropic ", Provider::Anthropic)]
    fn parses_provider_names(#[case] raw: &str, #[case] expected: Provider) {
        assert_eq!(raw.parse::<Provider>().unwrap(), expected);
    }

    #[test]
    fn unknown_provider_is_a_configuration_error() {
        let err = "cohere".parse::<Provider>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn default_model_is_in_catalog() {
        for provider in Provider::ALL {
            assert!(provider.models().contains(&provider.default_model()));
        }
    }

    #[test]
    fn judge_key_name_is_prefixed() {
        assert_eq!(Provider::Anthropic.judge_key_name(), "evaluator_anthropic");
    }
}
