use serde::{Deserialize, Serialize};

use super::{DEFAULT_LOG_ROTATE_KEEP, DEFAULT_LOG_ROTATE_SIZE};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
/// `[logging]`: where benchmark runs write their log and how it rotates.
pub struct LoggingConfig {
    /// A flexi_logger spec such as `info` or `llm_profile=debug`; `RUST_LOG` wins.
    pub level: String,
    /// Log file; defaults to `llm-profile.log` under the data dir's `logs/`.
    pub path: Option<String>,
    /// Bytes before the file is rotated.
    pub rotate_size: u64,
    /// Rotated files to keep.
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}
