use serde::{Deserialize, Serialize};

use crate::error::LLMError;

/// The kind of task a response is scored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Ordered, line-by-line comparison after normalization.
    StringMatch,
    /// Every expected word must appear somewhere in the response.
    EntityRecognition,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::StringMatch => "string_match",
            TaskKind::EntityRecognition => "entity_recognition",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskKind {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string_match" => Ok(TaskKind::StringMatch),
            "entity_recognition" => Ok(TaskKind::EntityRecognition),
            _ => Err(LLMError::Configuration(format!("Unknown task type: {s}"))),
        }
    }
}

/// Evaluation strategy selected at construction time.
///
/// Parsing never fails: unrecognised names become [`EvaluationMethod::Unknown`],
/// which scores every response as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationMethod {
    Algorithmic,
    LlmJudge,
    Unknown(String),
}

impl EvaluationMethod {
    pub fn is_known(&self) -> bool {
        !matches!(self, EvaluationMethod::Unknown(_))
    }
}

impl std::fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationMethod::Algorithmic => f.write_str("algorithmic"),
            EvaluationMethod::LlmJudge => f.write_str("llm_judge"),
            EvaluationMethod::Unknown(name) => f.write_str(name),
        }
    }
}

impl std::str::FromStr for EvaluationMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "algorithmic" => EvaluationMethod::Algorithmic,
            "llm_judge" | "llm" | "judge" => EvaluationMethod::LlmJudge,
            other => EvaluationMethod::Unknown(other.to_string()),
        })
    }
}

impl Serialize for EvaluationMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EvaluationMethod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.parse::<EvaluationMethod>() {
            Ok(method) => Ok(method),
            Err(never) => match never {},
        }
    }
}

/// Verdict for a single response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub passed: bool,
    /// Explanation of a failure; empty when the response passed.
    pub diagnostic: String,
}

impl EvaluationOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            diagnostic: String::new(),
        }
    }

    pub fn fail(diagnostic: impl Into<String>) -> Self {
        Self {
            passed: false,
            diagnostic: diagnostic.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("algorithmic", EvaluationMethod::Algorithmic)]
    #[case("Algorithmic", EvaluationMethod::Algorithmic)]
    #[case("LLM", EvaluationMethod::LlmJudge)]
    #[case("llm_judge", EvaluationMethod::LlmJudge)]
    #[case("regex", EvaluationMethod::Unknown("regex".into()))]
    fn parses_methods(#[case] raw: &str, #[case] expected: EvaluationMethod) {
        assert_eq!(raw.parse::<EvaluationMethod>().unwrap(), expected);
    }

    #[test]
    fn method_deserializes_unknown_names() {
        let method: EvaluationMethod = serde_json::from_str("\"fuzzy\"").unwrap();
        assert!(!method.is_known());
    }

    #[test]
    fn task_kind_round_trips_names() {
        for kind in [TaskKind::StringMatch, TaskKind::EntityRecognition] {
            assert_eq!(kind.as_str().parse::<TaskKind>().unwrap(), kind);
        }
        assert!("summary".parse::<TaskKind>().is_err());
    }
}
