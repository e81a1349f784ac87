//! Kafka IO round-trip integration harness.
//!
//! Writes a deterministic synthetic dataset to Kafka, reads it back and checks
//! what came out:
//!
//! - `streaming`: unbounded read, element count equals the number written
//! - `batch`: bounded read, aggregate hash equals the precomputed one
//! - `null-roundtrip`: a record with null key and value stays null
//! - `dynamic-partitions`: partitions added mid-read are discovered
//!
//! Write and read times are extracted from each run and optionally published
//! to InfluxDB.
//!
//! # CLI Usage
//!
//! ```bash
//! kafka-io-it run batch \
//!   --source-options '{"numRecords":1000,"keySizeBytes":10,"valueSizeBytes":90}' \
//!   --kafka-bootstrap-server-addresses localhost:9092 \
//!   --kafka-topic beam \
//!   --read-timeout 900
//! ```

pub mod broker;
pub mod error;
pub mod harness;
pub mod options;
pub mod report;
pub mod scenarios;
pub mod stages;
pub mod testing;

pub use broker::BrokerEnvironment;
pub use error::HarnessError;
pub use harness::Harness;
pub use options::HarnessOptions;
pub use report::{CheckResult, ScenarioReport, TestStatus};
pub use scenarios::Scenario;
