use crate::reader::MetricsReader;
use crate::{READ_TIME_METRIC, RUN_TIME_METRIC, WRITE_TIME_METRIC};
use chrono::{DateTime, Utc};
use pipeline::MetricResults;
use serde::Serialize;
use uuid::Uuid;

/// Identity shared by every metric of one harness process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunIdentity {
    pub test_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

impl RunIdentity {
    pub fn new() -> Self {
        Self {
            test_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }
}

impl Default for RunIdentity {
    fn default() -> Self {
        Self::new()
    }
}

/// One named measurement of a test run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTestResult {
    pub test_id: String,
    pub timestamp: DateTime<Utc>,
    pub metric: String,
    pub value: f64,
}

impl NamedTestResult {
    pub fn new(identity: &RunIdentity, metric: impl Into<String>, value: f64) -> Self {
        Self {
            test_id: identity.test_id.to_string(),
            timestamp: identity.timestamp,
            metric: metric.into(),
            value,
        }
    }
}

/// Elapsed seconds between the first and last timestamp recorded into `metric`.
fn elapsed_seconds(reader: &MetricsReader<'_>, metric: &str) -> f64 {
    let start = reader.start_time(metric);
    let end = reader.end_time(metric);
    (end - start) as f64 / 1e3
}

/// Write time, read time and their sum for one write/read pair of runs.
pub fn read_io_metrics(
    write: &MetricResults,
    read: &MetricResults,
    namespace: &str,
    identity: &RunIdentity,
) -> Vec<NamedTestResult> {
    let write_time = elapsed_seconds(&MetricsReader::new(write, namespace), WRITE_TIME_METRIC);
    let read_time = elapsed_seconds(&MetricsReader::new(read, namespace), READ_TIME_METRIC);

    vec![
        NamedTestResult::new(identity, WRITE_TIME_METRIC, write_time),
        NamedTestResult::new(identity, READ_TIME_METRIC, read_time),
        NamedTestResult::new(identity, RUN_TIME_METRIC, write_time + read_time),
    ]
}
