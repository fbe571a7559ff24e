use std::path::PathBuf;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

use crate::config::{ConfigPaths, LoggingConfig};

const DEFAULT_BASENAME: &str = "llm-profile";

/// The returned handle must stay alive for file output to keep flushing.
pub fn init_logging(config: &LoggingConfig, paths: &ConfigPaths) -> anyhow::Result<LoggerHandle> {
    let (directory, basename) = log_file_location(config, paths);
    let handle = Logger::try_with_env_or_str(&config.level)?
        .log_to_file(FileSpec::default().directory(directory).basename(basename))
        .rotate(
            Criterion::Size(config.rotate_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config.rotate_keep),
        )
        .start()?;
    log::debug!("Logging initialised at level '{}'", config.level);
    Ok(handle)
}

/// Directory and file stem for the log, from `[logging].path` or the data dir.
fn log_file_location(config: &LoggingConfig, paths: &ConfigPaths) -> (PathBuf, String) {
    let Some(path) = config.path.as_ref().map(PathBuf::from) else {
        return (paths.logs_dir.clone(), DEFAULT_BASENAME.to_string());
    };
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| paths.logs_dir.clone());
    let basename = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(DEFAULT_BASENAME)
        .to_string();
    (directory, basename)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> ConfigPaths {
        ConfigPaths {
            config_file: PathBuf::from("/cfg/config.toml"),
            config_dir: PathBuf::from("/cfg"),
            data_dir: PathBuf::from("/data"),
            logs_dir: PathBuf::from("/data/logs"),
        }
    }

    #[test]
    fn defaults_to_the_logs_dir() {
        let (dir, stem) = log_file_location(&LoggingConfig::default(), &paths());
        assert_eq!(dir, PathBuf::from("/data/logs"));
        assert_eq!(stem, "llm-profile");
    }

    #[test]
    fn configured_path_is_split_into_dir_and_stem() {
        let config = LoggingConfig {
            path: Some("/var/log/bench/run.log".into()),
            ..LoggingConfig::default()
        };
        let (dir, stem) = log_file_location(&config, &paths());
        assert_eq!(dir, PathBuf::from("/var/log/bench"));
        assert_eq!(stem, "run");

        let bare = LoggingConfig {
            path: Some("run.log".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(log_file_location(&bare, &paths()).0, PathBuf::from("/data/logs"));
    }
}
