use serde::{Deserialize, Serialize};

use super::{
    EvaluationConfig, LoggingConfig, ModelConfig, OutputConfig, RunConfig, StorageConfig,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}
