//! Building blocks shared by the scenarios: write, read and verify.

pub mod read;
pub mod verify;
pub mod write;

pub use read::{read_stage, ReadOutcome, ReadSink};
pub use verify::{expected_hash_for, record_to_string, EXPECTED_HASHES};
pub use write::{synthetic_records, write_stage, WriteSchedule};

/// Namespace of every metric the harness records.
pub const NAMESPACE: &str = "kafka_io_it";
