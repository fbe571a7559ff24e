use std::io;
use std::path::PathBuf;

/// Failures while locating, reading or writing `config.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("cannot serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("no home directory to place config and data under")]
    MissingHome,
    #[error("config path {} has no parent directory", .0.display())]
    InvalidPath(PathBuf),
}
