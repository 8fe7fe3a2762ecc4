use serde::{Deserialize, Serialize};

/// Per-trial (TTL) or per-task (stress) latencies in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingSample {
    durations_ms: Vec<i64>,
}

impl TimingSample {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            durations_ms: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, duration_ms: i64) {
        self.durations_ms.push(duration_ms);
    }

    pub fn total_ms(&self) -> i64 {
        self.durations_ms.iter().sum()
    }

    /// Truncating mean, `None` for an empty sample.
    pub fn average_ms(&self) -> Option<i64> {
        if self.durations_ms.is_empty() {
            return None;
        }
        Some(self.total_ms() / self.durations_ms.len() as i64)
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.durations_ms
    }
}

impl From<Vec<i64>> for TimingSample {
    fn from(durations_ms: Vec<i64>) -> Self {
        Self { durations_ms }
    }
}

/// Steady-state latency of one query or group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TtlResult {
    pub id: String,
    #[serde(rename = "averageDuration")]
    pub average_duration_ms: i64,
    #[serde(rename = "times")]
    pub samples: Vec<i64>,
}

/// One passing stress level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressLevelResult {
    pub id: String,
    /// Concurrency of this level
    pub attempts: u32,
    /// Wall time of the whole fan-out, warm-up excluded
    #[serde(rename = "duration")]
    pub total_duration_ms: i64,
    #[serde(rename = "eachDurations")]
    pub per_task_durations_ms: Vec<i64>,
}

/// Row-set equivalence of a query and its paired test query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyResult {
    pub name: String,
    #[serde(rename = "testCount")]
    pub test_count: i64,
    #[serde(rename = "count")]
    pub baseline_count: i64,
    /// `None` when the row counts differ and the union was never evaluated
    #[serde(rename = "unionCount")]
    pub union_count: Option<i64>,
    pub success: bool,
}

impl AccuracyResult {
    pub fn new(name: &str, baseline_count: i64, test_count: i64, union_count: Option<i64>) -> Self {
        let success = test_count == baseline_count && union_count == Some(baseline_count);
        Self {
            name: name.to_string(),
            test_count,
            baseline_count,
            union_count,
            success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_truncates() {
        let sample = TimingSample::from(vec![10, 11, 12, 12]);
        assert_eq!(sample.total_ms(), 45);
        assert_eq!(sample.average_ms(), Some(11));
    }

    #[test]
    fn test_empty_sample_has_no_average() {
        assert_eq!(TimingSample::default().average_ms(), None);
    }

    #[test]
    fn test_accuracy_success_rule() {
        assert!(AccuracyResult::new("q1", 5, 5, Some(5)).success);
        assert!(!AccuracyResult::new("q1", 5, 5, Some(6)).success);
        assert!(!AccuracyResult::new("q1", 5, 4, None).success);
        // Two empty results are equivalent
        assert!(AccuracyResult::new("q1", 0, 0, Some(0)).success);
    }

    #[test]
    fn test_json_field_names() {
        let ttl = TtlResult {
            id: "q1".to_string(),
            average_duration_ms: 12,
            samples: vec![11, 13],
        };
        let json = serde_json::to_value(&ttl).unwrap();
        assert_eq!(json["averageDuration"], 12);
        assert_eq!(json["times"], serde_json::json!([11, 13]));

        let acc = AccuracyResult::new("q1", 5, 4, None);
        let json = serde_json::to_value(&acc).unwrap();
        assert_eq!(json["count"], 5);
        assert_eq!(json["testCount"], 4);
        assert!(json["unionCount"].is_null());
        assert_eq!(json["success"], false);
    }
}
