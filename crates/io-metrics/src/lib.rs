//! Metrics extraction and publishing for IO round-trip tests.
//!
//! A finished run's [`pipeline::MetricResults`] are read through a
//! [`MetricsReader`], turned into [`NamedTestResult`]s tagged with the run's
//! [`RunIdentity`], and optionally written to InfluxDB.

pub mod error;
pub mod influx;
pub mod reader;
pub mod result;

pub use error::MetricsError;
pub use influx::{InfluxDbPublisher, InfluxDbSettings};
pub use reader::MetricsReader;
pub use result::{read_io_metrics, NamedTestResult, RunIdentity};

/// Distribution recorded by the write stage's time monitor.
pub const WRITE_TIME_METRIC: &str = "write_time";
/// Distribution recorded by the read stage's time monitor.
pub const READ_TIME_METRIC: &str = "read_time";
/// Sum of write and read time.
pub const RUN_TIME_METRIC: &str = "run_time";
/// Counter of elements seen by a counting read.
pub const READ_ELEMENT_COUNT_METRIC: &str = "kafka_read_element_count";
