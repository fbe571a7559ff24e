use std::time::Duration;

use serde::Serialize;

use super::record::TrialResult;

/// Statistics derived from a frozen set of trial results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub total: usize,
    pub correct_count: usize,
    /// `correct_count / total`, or 0 when there are no results.
    pub success_rate: f64,
    pub mean_response_secs: f64,
    pub min_response_secs: f64,
    pub max_response_secs: f64,
}

impl AggregateSummary {
    pub fn from_records(records: &[TrialResult]) -> Self {
        let total = records.len();
        if total == 0 {
            return Self::default();
        }

        let correct_count = records.iter().filter(|r| r.correct).count();
        let times: Vec<Duration> = records.iter().map(|r| r.response_time).collect();
        let sum: Duration = times.iter().sum();
        let min = times.iter().min().copied().unwrap_or_default();
        let max = times.iter().max().copied().unwrap_or_default();

        Self {
            total,
            correct_count,
            success_rate: correct_count as f64 / total as f64,
            mean_response_secs: sum.as_secs_f64() / total as f64,
            min_response_secs: min.as_secs_f64(),
            max_response_secs: max.as_secs_f64(),
        }
    }

    pub fn correct_percentage(&self) -> f64 {
        self.success_rate * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(correct: bool, millis: u64) -> TrialResult {
        TrialResult {
            trial_index: 0,
            correct,
            response_time: Duration::from_millis(millis),
            response_text: String::new(),
            expected_output: String::new(),
            evaluation_log: String::new(),
        }
    }

    #[test]
    fn empty_summary_has_zero_rate() {
        let summary = AggregateSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert!(!summary.success_rate.is_nan());
    }

    #[test]
    fn rate_is_exact_ratio() {
        let records = vec![record(true, 100), record(false, 300), record(true, 200)];
        let summary = AggregateSummary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct_count, 2);
        assert_eq!(summary.success_rate, 2.0 / 3.0);
        assert!((summary.mean_response_secs - 0.2).abs() < 1e-9);
        assert_eq!(summary.min_response_secs, 0.1);
        assert_eq!(summary.max_response_secs, 0.3);
    }
}
