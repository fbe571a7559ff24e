use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::bail;
use llm_profile::credential_store::CredentialStore;

use crate::config::{AppConfig, ConfigPaths};

const PASSWORD_ENV: &str = "LLM_PROFILE_PASSWORD";

pub fn open_store(config: &AppConfig, paths: &ConfigPaths) -> CredentialStore {
    let dir = config
        .storage
        .credentials_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.credentials_dir());
    CredentialStore::new(dir)
}

/// Password from the flag, then `LLM_PROFILE_PASSWORD`, then one line of stdin.
pub fn resolve_password(flag: Option<&str>) -> anyhow::Result<String> {
    if let Some(password) = flag {
        return Ok(password.to_string());
    }
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("A password is required");
    }
    Ok(password)
}
