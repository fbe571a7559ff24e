mod error;
mod load;
mod paths;
mod save;
mod types;

pub use load::{load_config, LoadedConfig};
pub use paths::ConfigPaths;
pub use save::save_config;
pub use types::{AppConfig, LoggingConfig};
