mod app;
mod evaluation;
mod logging;
mod model;
mod output;
mod run;
mod storage;

const DEFAULT_TEMPERATURE: f32 = 1.0;
const DEFAULT_MAX_TOKENS: u32 = 150;
const DEFAULT_TRIALS: usize = 50;
const DEFAULT_WORKERS: usize = 5;
const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;

pub use app::AppConfig;
pub use evaluation::EvaluationConfig;
pub use logging::LoggingConfig;
pub use model::ModelConfig;
pub use output::OutputConfig;
pub use run::RunConfig;
pub use storage::StorageConfig;
