use std::io::{self, Write};
use std::sync::Arc;

use anyhow::bail;
use llm_profile::builder::{ClientBuilder, Provider};
use llm_profile::credential_store::{CredentialStore, UserCredentials};
use llm_profile::evaluator::Evaluator;
use llm_profile::metrics::{export_csv, export_json};
use llm_profile::trial::{Progress, ProgressSink, RunContext, TrialConfig, TrialRunner};
use llm_profile::ModelClient;

use super::credentials::{open_store, resolve_password};
use super::settings::RunSettings;
use super::summary::print_summary;
use crate::args::RunArgs;
use crate::config::LoadedConfig;

pub async fn run_benchmark(args: &RunArgs, loaded: &LoadedConfig) -> anyhow::Result<()> {
    let settings = RunSettings::resolve(args, &loaded.config)?;
    let store = open_store(&loaded.config, &loaded.paths);
    let mut credentials = match &args.user {
        Some(user) => {
            let password = resolve_password(args.password.as_deref())?;
            Some(store.login(user, &password)?)
        }
        None => None,
    };

    let api_key = args
        .api_key
        .clone()
        .or_else(|| stored_key(credentials.as_ref(), settings.provider, false))
        .or_else(|| env_key(settings.provider));
    let Some(api_key) = api_key else {
        bail!("API key for {} is missing", settings.provider);
    };

    let mut builder = ClientBuilder::new()
        .provider(settings.provider)
        .api_key(api_key)
        .model(&settings.model);
    if let Some(url) = &settings.base_url {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = settings.timeout_seconds {
        builder = builder.timeout_seconds(timeout);
    }
    let client: Arc<dyn ModelClient> = Arc::new(builder.build()?);

    let mut evaluator = Evaluator::builder(settings.task, &settings.expected_output)
        .method(settings.method.clone());
    if let Some(judge) = &settings.judge {
        let judge_key = if judge.use_existing_key {
            stored_key(credentials.as_ref(), judge.provider, true)
                .or_else(|| env_key(judge.provider))
        } else {
            args.judge_api_key.clone()
        };
        let Some(judge_key) = judge_key else {
            bail!("API key for evaluator LLM ({}) is missing", judge.provider);
        };
        if args.save_judge_key {
            save_judge_key(&store, credentials.as_mut(), judge.provider, &judge_key)?;
        }

        let mut judge_builder = ClientBuilder::new()
            .provider(judge.provider)
            .api_key(judge_key)
            .model(&judge.model);
        if let Some(timeout) = settings.timeout_seconds {
            judge_builder = judge_builder.timeout_seconds(timeout);
        }
        evaluator = evaluator.judge(Arc::new(judge_builder.build()?));
        if let Some(prompt) = &judge.prompt {
            evaluator = evaluator.judge_prompt(prompt);
        }
    }

    let config = TrialConfig::new(&settings.prompt, settings.trials, settings.workers)
        .options(settings.options.clone());
    let context = RunContext::new(client, evaluator.build()?, config);
    let runner = TrialRunner::new(context)?.with_progress(stderr_progress());

    eprintln!(
        "Running {} trials against {}:{} with {} workers",
        settings.trials, settings.provider, settings.model, settings.workers
    );
    let outcome = runner.run().await;
    eprintln!();

    print_summary(&outcome);

    let username = credentials.as_ref().map(UserCredentials::username);
    let csv_path = settings.csv_path(username);
    export_csv(&outcome.metrics, &csv_path)?;
    println!("Results written to {}", csv_path.display());
    if let Some(json_path) = &settings.json {
        export_json(&outcome.metrics, json_path)?;
        println!("JSON written to {}", json_path.display());
    }
    Ok(())
}

fn stored_key(
    credentials: Option<&UserCredentials>,
    provider: Provider,
    for_judge: bool,
) -> Option<String> {
    let credentials = credentials?;
    let key = if for_judge {
        credentials.judge_api_key(provider)
    } else {
        credentials.api_key(provider)
    };
    key.map(str::to_string)
}

fn env_key(provider: Provider) -> Option<String> {
    std::env::var(provider.env_key())
        .ok()
        .filter(|key| !key.trim().is_empty())
}

fn save_judge_key(
    store: &CredentialStore,
    credentials: Option<&mut UserCredentials>,
    provider: Provider,
    key: &str,
) -> anyhow::Result<()> {
    let Some(credentials) = credentials else {
        bail!("--save-judge-key requires --user");
    };
    credentials.set_api_key(provider.judge_key_name(), key);
    store.update(credentials)?;
    log::info!("Saved {} evaluator key for '{}'", provider, credentials.username());
    eprintln!("{provider} evaluator API key saved.");
    Ok(())
}

fn stderr_progress() -> ProgressSink {
    Arc::new(|progress: Progress| {
        let mut stderr = io::stderr().lock();
        let _ = write!(
            stderr,
            "\rProgress: {:>5.1}% ({}/{}, {} failed)",
            progress.fraction() * 100.0,
            progress.completed,
            progress.total,
            progress.failed
        );
        let _ = stderr.flush();
    })
}
