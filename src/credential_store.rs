use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::builder::Provider;
use crate::error::LLMError;

/// On-disk layout of `<username>_credentials.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    username: String,
    password: String,
    #[serde(default)]
    api_keys: BTreeMap<String, String>,
}

/// A user's stored password hash and provider keys.
///
/// Keys are held as [`SecretString`] and only exposed when handed to a client.
#[derive(Debug)]
pub struct UserCredentials {
    username: String,
    password_hash: String,
    api_keys: BTreeMap<String, SecretString>,
}

impl UserCredentials {
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Checks `password` against the stored SHA-256 hex digest.
    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }

    /// Key stored under the provider's own name, if non-empty.
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.key(provider.as_str())
    }

    /// Key for the judge: `evaluator_<provider>` first, then the main key.
    pub fn judge_api_key(&self, provider: Provider) -> Option<&str> {
        self.key(&provider.judge_key_name())
            .or_else(|| self.api_key(provider))
    }

    pub fn set_api_key(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.api_keys
            .insert(name.into(), SecretString::new(value.into()));
    }

    fn key(&self, name: &str) -> Option<&str> {
        self.api_keys
            .get(name)
            .map(|secret| secret.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }

    fn to_file(&self) -> CredentialFile {
        CredentialFile {
            username: self.username.clone(),
            password: self.password_hash.clone(),
            api_keys: self
                .api_keys
                .iter()
                .map(|(name, secret)| (name.clone(), secret.expose_secret().clone()))
                .collect(),
        }
    }
}

impl From<CredentialFile> for UserCredentials {
    fn from(file: CredentialFile) -> Self {
        Self {
            username: file.username,
            password_hash: file.password,
            api_keys: file
                .api_keys
                .into_iter()
                .map(|(name, value)| (name, SecretString::new(value)))
                .collect(),
        }
    }
}

/// Per-user credential files kept in a single directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}_credentials.json"))
    }

    /// Returns `None` when the user has never signed up.
    pub fn load(&self, username: &str) -> Result<Option<UserCredentials>, LLMError> {
        validate_username(username)?;
        match fs::read_to_string(self.path_for(username)) {
            Ok(contents) => {
                let file: CredentialFile = serde_json::from_str(&contents)?;
                Ok(Some(file.into()))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Creates or replaces a user record, hashing `password`.
    pub fn save(
        &self,
        username: &str,
        password: &str,
        api_keys: BTreeMap<String, String>,
    ) -> Result<UserCredentials, LLMError> {
        validate_username(username)?;
        let credentials = UserCredentials::from(CredentialFile {
            username: username.to_string(),
            password: hash_password(password),
            api_keys,
        });
        self.persist(&credentials)?;
        Ok(credentials)
    }

    /// Writes an already loaded record back, keeping its password hash.
    pub fn update(&self, credentials: &UserCredentials) -> Result<(), LLMError> {
        validate_username(&credentials.username)?;
        self.persist(credentials)
    }

    /// Loads `username` and checks the password. Unknown users and wrong
    /// passwords both yield an authentication error.
    pub fn login(&self, username: &str, password: &str) -> Result<UserCredentials, LLMError> {
        match self.load(username)? {
            Some(credentials) if credentials.verify_password(password) => Ok(credentials),
            _ => Err(LLMError::AuthError("Invalid username or password".into())),
        }
    }

    fn persist(&self, credentials: &UserCredentials) -> Result<(), LLMError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&credentials.username);
        let contents = serde_json::to_string_pretty(&credentials.to_file())?;
        fs::write(&path, contents)?;
        restrict_permissions(&path)?;
        log::debug!("Saved credentials for '{}'", credentials.username);
        Ok(())
    }
}

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn validate_username(username: &str) -> Result<(), LLMError> {
    let valid = !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !username.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(LLMError::config(format!("Invalid username '{username}'")))
    }
}

fn restrict_permissions(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
