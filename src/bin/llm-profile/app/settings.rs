use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use llm_profile::builder::Provider;
use llm_profile::evaluator::{EvaluationMethod, TaskKind};
use llm_profile::{GenerationOptions, LLMError};

use crate::args::RunArgs;
use crate::config::AppConfig;

/// Everything a benchmark run needs, after flags have been layered over the
/// config file.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub provider: Provider,
    pub model: String,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub options: GenerationOptions,
    pub prompt: String,
    pub trials: usize,
    pub workers: usize,
    pub task: TaskKind,
    pub expected_output: String,
    pub method: EvaluationMethod,
    pub judge: Option<JudgeSettings>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct JudgeSettings {
    pub provider: Provider,
    pub model: String,
    pub prompt: Option<String>,
    pub use_existing_key: bool,
}

impl RunSettings {
    pub fn resolve(args: &RunArgs, config: &AppConfig) -> anyhow::Result<Self> {
        let provider = match &args.provider {
            Some(name) => name.parse::<Provider>()?,
            None => config.model.provider,
        };
        let model = args
            .model
            .clone()
            .or_else(|| config.model.model.clone())
            .unwrap_or_else(|| provider.default_model().to_string());
        let options = GenerationOptions::new()
            .temperature(args.temperature.unwrap_or(config.model.temperature))
            .max_tokens(args.max_tokens.unwrap_or(config.model.max_tokens));

        let prompt = text_source(
            args.prompt.as_deref(),
            args.prompt_file.as_deref(),
            config.run.prompt.as_deref(),
        )?
        .ok_or_else(|| LLMError::config("No prompt given; use --prompt, --prompt-file or [run].prompt"))?;
        let expected_output = text_source(
            args.expected.as_deref(),
            args.expected_file.as_deref(),
            config.evaluation.expected_output.as_deref(),
        )?
        .ok_or_else(|| {
            LLMError::config(
                "No expected output given; use --expected, --expected-file or [evaluation].expected_output",
            )
        })?;

        let task = match &args.task_type {
            Some(name) => name.parse::<TaskKind>()?,
            None => config.evaluation.task_type,
        };
        let method = args
            .method
            .as_deref()
            .unwrap_or(&config.evaluation.method)
            .parse::<EvaluationMethod>()
            .unwrap_or_else(|never| match never {});
        if !method.is_known() {
            return Err(LLMError::config(format!(
                "Unknown evaluation method '{method}'; expected 'algorithmic' or 'llm_judge'"
            ))
            .into());
        }

        let judge = if method == EvaluationMethod::LlmJudge {
            let judge_provider = match &args.judge_provider {
                Some(name) => name.parse::<Provider>()?,
                None => config.evaluation.judge_provider.unwrap_or(provider),
            };
            let judge_model = args
                .judge_model
                .clone()
                .or_else(|| config.evaluation.judge_model.clone())
                .unwrap_or_else(|| judge_provider.default_model().to_string());
            let prompt = match &args.judge_prompt_file {
                Some(path) => Some(read_text(path)?),
                None => config.evaluation.judge_prompt.clone(),
            };
            Some(JudgeSettings {
                provider: judge_provider,
                model: judge_model,
                prompt,
                use_existing_key: args.judge_api_key.is_none()
                    && config.evaluation.judge_use_existing_key,
            })
        } else {
            None
        };

        Ok(Self {
            provider,
            model,
            base_url: args.base_url.clone().or_else(|| config.model.base_url.clone()),
            timeout_seconds: args.timeout_seconds.or(config.model.timeout_seconds),
            options,
            prompt,
            trials: args.trials.unwrap_or(config.run.trials),
            workers: args.workers.unwrap_or(config.run.workers),
            task,
            expected_output,
            method,
            judge,
            csv: args.csv.clone().or_else(|| config.output.csv.as_ref().map(PathBuf::from)),
            json: args.json.clone().or_else(|| config.output.json.as_ref().map(PathBuf::from)),
        })
    }

    /// CSV destination, defaulting to `<username>_results.csv`.
    pub fn csv_path(&self, username: Option<&str>) -> PathBuf {
        self.csv.clone().unwrap_or_else(|| {
            PathBuf::from(format!("{}_results.csv", username.unwrap_or("anonymous")))
        })
    }
}

fn text_source(
    inline: Option<&str>,
    file: Option<&Path>,
    fallback: Option<&str>,
) -> anyhow::Result<Option<String>> {
    let text = match (inline, file) {
        (Some(text), _) => Some(text.to_string()),
        (None, Some(path)) => Some(read_text(path)?),
        (None, None) => fallback.map(str::to_string),
    };
    Ok(text.filter(|text| !text.trim().is_empty()))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}
