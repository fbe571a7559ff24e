use std::time::Duration;

use serde::{Serialize, Serializer};

/// Outcome of one completed trial. Created once and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    /// Dispatch index, for traceability only; log order is completion order.
    pub trial_index: usize,
    pub correct: bool,
    /// Wall-clock time of the generate call, serialized as seconds.
    #[serde(rename = "response_time", serialize_with = "as_secs_f64")]
    pub response_time: Duration,
    #[serde(rename = "response")]
    pub response_text: String,
    pub expected_output: String,
    /// Evaluator diagnostic; empty when the response passed.
    pub evaluation_log: String,
}

fn as_secs_f64<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_response_time_in_seconds() {
        let result = TrialResult {
            trial_index: 3,
            correct: true,
            response_time: Duration::from_millis(1500),
            response_text: "Paris".into(),
            expected_output: "Paris".into(),
            evaluation_log: String::new(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["response_time"], 1.5);
        assert_eq!(json["response"], "Paris");
    }
}
