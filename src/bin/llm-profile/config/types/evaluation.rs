use llm_profile::builder::Provider;
use llm_profile::evaluator::TaskKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub task_type: TaskKind,
    pub expected_output: Option<String>,
    /// `algorithmic` or `llm_judge`.
    pub method: String,
    pub judge_provider: Option<Provider>,
    pub judge_model: Option<String>,
    pub judge_prompt: Option<String>,
    /// Reuse the stored `evaluator_<provider>` or main key for the judge.
    pub judge_use_existing_key: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            task_type: TaskKind::StringMatch,
            expected_output: None,
            method: "algorithmic".to_string(),
            judge_provider: None,
            judge_model: None,
            judge_prompt: None,
            judge_use_existing_key: true,
        }
    }
}
