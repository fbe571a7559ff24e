use serde::{Deserialize, Serialize};

/// Export destinations. The CSV defaults to `<username>_results.csv` in the
/// working directory.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv: Option<String>,
    pub json: Option<String>,
}
