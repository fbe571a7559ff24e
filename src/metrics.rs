#[path = "metrics/record.rs"]
mod record;

#[path = "metrics/summary.rs"]
mod summary;

#[path = "metrics/trial_log.rs"]
mod trial_log;

#[path = "metrics/export.rs"]
pub mod export;

pub use export::{export_csv, export_json, write_csv, CSV_HEADER};
pub use record::TrialResult;
pub use summary::AggregateSummary;
pub use trial_log::{MetricsExport, MetricsLog};
