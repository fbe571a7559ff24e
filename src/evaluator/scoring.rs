use std::sync::Arc;

use crate::client::{GenerationOptions, ModelClient};
use crate::error::LLMError;

use super::normalize::{format_set, normalized_lines, word_tokens};
use super::template::PromptTemplate;
use super::types::{EvaluationMethod, EvaluationOutcome, TaskKind};

/// Model invoked to render a verdict on another model's output.
#[derive(Clone)]
struct Judge {
    client: Arc<dyn ModelClient>,
    template: PromptTemplate,
    options: GenerationOptions,
}

/// Scores responses against a fixed expected output.
///
/// Immutable once built, so a single instance is shared by every trial of a
/// run without synchronization.
#[derive(Clone)]
pub struct Evaluator {
    task: TaskKind,
    expected_output: String,
    method: EvaluationMethod,
    judge: Option<Judge>,
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("task", &self.task)
            .field("expected_output", &self.expected_output)
            .field("method", &self.method)
            .field(
                "judge",
                &self.judge.as_ref().map(|judge| judge.client.describe()),
            )
            .finish()
    }
}

/// Builder for [`Evaluator`].
pub struct EvaluatorBuilder {
    task: TaskKind,
    expected_output: String,
    method: EvaluationMethod,
    judge: Option<Arc<dyn ModelClient>>,
    judge_prompt: Option<String>,
    judge_options: GenerationOptions,
}

impl EvaluatorBuilder {
    fn new(task: TaskKind, expected_output: impl Into<String>) -> Self {
        Self {
            task,
            expected_output: expected_output.into(),
            method: EvaluationMethod::Algorithmic,
            judge: None,
            judge_prompt: None,
            judge_options: GenerationOptions::default(),
        }
    }

    /// Sets the evaluation strategy. Defaults to algorithmic.
    pub fn method(mut self, method: EvaluationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the model used by the judge strategy.
    pub fn judge(mut self, client: Arc<dyn ModelClient>) -> Self {
        self.judge = Some(client);
        self
    }

    /// Sets a custom judge prompt template.
    pub fn judge_prompt(mut self, template: impl Into<String>) -> Self {
        self.judge_prompt = Some(template.into());
        self
    }

    /// Sets generation options for judge calls.
    pub fn judge_options(mut self, options: GenerationOptions) -> Self {
        self.judge_options = options;
        self
    }

    /// Validates the configuration. Judge problems surface here, before any
    /// trial runs.
    pub fn build(self) -> Result<Evaluator, LLMError> {
        let judge = match self.method {
            EvaluationMethod::LlmJudge => {
                let client = self.judge.ok_or_else(|| {
                    LLMError::config("A judge model is required for llm_judge evaluation")
                })?;
                let template = match self.judge_prompt.as_deref() {
                    Some(source) => PromptTemplate::parse(source)?,
                    None => PromptTemplate::default(),
                };
                Some(Judge {
                    client,
                    template,
                    options: self.judge_options,
                })
            }
            EvaluationMethod::Unknown(ref name) => {
                log::warn!("Unknown evaluation method '{name}': every response will be scored as incorrect");
                None
            }
            EvaluationMethod::Algorithmic => None,
        };

        Ok(Evaluator {
            task: self.task,
            expected_output: self.expected_output.trim().to_string(),
            method: self.method,
            judge,
        })
    }
}

impl Evaluator {
    pub fn builder(task: TaskKind, expected_output: impl Into<String>) -> EvaluatorBuilder {
        EvaluatorBuilder::new(task, expected_output)
    }

    /// Algorithmic evaluator; cannot fail to build.
    pub fn algorithmic(task: TaskKind, expected_output: impl Into<String>) -> Self {
        Self {
            task,
            expected_output: expected_output.into().trim().to_string(),
            method: EvaluationMethod::Algorithmic,
            judge: None,
        }
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }

    pub fn method(&self) -> &EvaluationMethod {
        &self.method
    }

    /// The expected output, trimmed.
    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    /// Scores one response. Only the judge strategy can fail, when the judge
    /// call itself fails.
    pub async fn evaluate(&self, response: &str) -> Result<EvaluationOutcome, LLMError> {
        let response = response.trim();
        match (&self.method, &self.judge) {
            (EvaluationMethod::Algorithmic, _) => Ok(self.algorithmic_evaluate(response)),
            (EvaluationMethod::LlmJudge, Some(judge)) => self.judge_evaluate(judge, response).await,
            (EvaluationMethod::LlmJudge, None) => Err(LLMError::config(
                "A judge model is required for llm_judge evaluation",
            )),
            (EvaluationMethod::Unknown(_), _) => Ok(EvaluationOutcome::fail("")),
        }
    }

    fn algorithmic_evaluate(&self, response: &str) -> EvaluationOutcome {
        match self.task {
            TaskKind::StringMatch => self.string_match(response),
            TaskKind::EntityRecognition => self.entity_match(response),
        }
    }

    fn string_match(&self, response: &str) -> EvaluationOutcome {
        let expected = normalized_lines(&self.expected_output);
        let actual = normalized_lines(response);
        if expected == actual {
            return EvaluationOutcome::pass();
        }

        let missing: Vec<_> = expected.iter().filter(|line| !actual.contains(line)).collect();
        let extra: Vec<_> = actual.iter().filter(|line| !expected.contains(line)).collect();
        let mut diagnostic = format!(
            "Words missing in response: {}\nExtra words in response: {}",
            format_set(missing.iter().copied()),
            format_set(extra.iter().copied())
        );
        if missing.is_empty() && extra.is_empty() {
            diagnostic.push_str("\nSame lines, but their order or repetition differs");
        }
        EvaluationOutcome::fail(diagnostic)
    }

    fn entity_match(&self, response: &str) -> EvaluationOutcome {
        let expected = word_tokens(&self.expected_output);
        let actual = word_tokens(response);
        if expected.is_subset(&actual) {
            return EvaluationOutcome::pass();
        }

        EvaluationOutcome::fail(format!(
            "Missing entities: {}\nExtra entities in response: {}",
            format_set(expected.difference(&actual)),
            format_set(actual.difference(&expected))
        ))
    }

    async fn judge_evaluate(
        &self,
        judge: &Judge,
        response: &str,
    ) -> Result<EvaluationOutcome, LLMError> {
        let prompt = judge
            .template
            .render(self.task, &self.expected_output, response);
        let verdict = judge.client.generate(&prompt, &judge.options).await?;
        if verdict.to_lowercase().contains("yes") {
            Ok(EvaluationOutcome::pass())
        } else {
            log::debug!("Judge {} rejected response", judge.client.describe());
            Ok(EvaluationOutcome::fail(verdict.trim()))
        }
    }
}
