use std::path::PathBuf;

use super::error::ConfigError;

const APP_DIR: &str = "llm-profile";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl ConfigPaths {
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = default_data_dir()?;
        let logs_dir = data_dir.join("logs");
        let (config_dir, config_file) = match config_override {
            Some(path) => {
                let dir = path
                    .parent()
                    .map(PathBuf::from)
                    .ok_or_else(|| ConfigError::InvalidPath(path.clone()))?;
                (dir, path)
            }
            None => {
                let dir = default_config_dir()?;
                let file = dir.join("config.toml");
                (dir, file)
            }
        };
        Ok(Self {
            config_file,
            config_dir,
            data_dir,
            logs_dir,
        })
    }

    /// Where `<username>_credentials.json` files live unless overridden.
    pub fn credentials_dir(&self) -> PathBuf {
        self.data_dir.join("credentials")
    }
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".config").join(APP_DIR))
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::MissingHome)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}
