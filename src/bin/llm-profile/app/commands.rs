use std::collections::BTreeMap;

use anyhow::bail;
use llm_profile::builder::Provider;

use super::credentials::{open_store, resolve_password};
use crate::args::SignupArgs;
use crate::config::{save_config, AppConfig, ConfigPaths, LoadedConfig};

pub fn signup(args: &SignupArgs, config: &AppConfig, paths: &ConfigPaths) -> anyhow::Result<()> {
    let store = open_store(config, paths);
    if store.load(&args.user)?.is_some() {
        bail!("User '{}' already exists", args.user);
    }
    let password = resolve_password(args.password.as_deref())?;

    let mut api_keys = BTreeMap::new();
    for (provider, key) in [
        (Provider::OpenAI, &args.openai_key),
        (Provider::Anthropic, &args.anthropic_key),
    ] {
        if let Some(key) = key {
            api_keys.insert(provider.as_str().to_string(), key.clone());
        }
    }
    store.save(&args.user, &password, api_keys)?;
    log::info!("Created user '{}'", args.user);
    println!("Account created for '{}'.", args.user);
    println!("Stored at {}", store.path_for(&args.user).display());
    Ok(())
}

pub fn list_models(provider: Option<&str>) -> anyhow::Result<()> {
    let providers = match provider {
        Some(name) => vec![name.parse::<Provider>()?],
        None => Provider::ALL.to_vec(),
    };
    for provider in providers {
        println!("{provider}");
        for model in provider.models() {
            let marker = if *model == provider.default_model() {
                " (default)"
            } else {
                ""
            };
            println!("  {model}{marker}");
        }
    }
    Ok(())
}

pub fn init_config(loaded: &LoadedConfig, force: bool) -> anyhow::Result<()> {
    if loaded.config_exists && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            loaded.paths.config_file.display()
        );
    }
    save_config(&loaded.config, &loaded.paths)?;
    println!("Wrote {}", loaded.paths.config_file.display());
    Ok(())
}
