use parking_lot::Mutex;
use serde::Serialize;

use super::record::TrialResult;
use super::summary::AggregateSummary;

/// Append-only, thread-safe collection of trial results.
///
/// Records are kept in completion order. Each append takes the lock once, so
/// concurrent appends are linearizable and never interleave.
#[derive(Debug, Default)]
pub struct MetricsLog {
    records: Mutex<Vec<TrialResult>>,
}

/// Snapshot of a log: raw records plus the derived summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsExport {
    pub summary: AggregateSummary,
    pub records: Vec<TrialResult>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn append(&self, result: TrialResult) {
        self.records.lock().push(result);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Snapshots the records under the lock, then derives the summary from the copy.
    pub fn export(&self) -> MetricsExport {
        let records = self.records.lock().clone();
        MetricsExport {
            summary: AggregateSummary::from_records(&records),
            records,
        }
    }

    /// Consumes the log once no more appends can happen.
    pub fn into_export(self) -> MetricsExport {
        let records = self.records.into_inner();
        MetricsExport {
            summary: AggregateSummary::from_records(&records),
            records,
        }
    }
}
