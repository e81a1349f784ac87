//! Synthetic record source for the kafka-io-it harness.
//!
//! This crate provides the `SyntheticGenerator` which produces deterministic
//! key/value byte records from a small JSON options blob. Every record is a pure
//! function of `(seed, index)`, so the write side and any expected-value
//! computation agree without sharing state.
//!
//! # Architecture
//!
//! ```text
//! source options (JSON)
//!        │
//!        ▼
//! ┌────────────────────┐
//! │ SyntheticGenerator │
//! │                    │
//! │  - options         │
//! │  - index           │
//! └─────────┬──────────┘
//!           │
//!           ▼
//!   SyntheticRecord { index, key, value }
//! ```
//!
//! # Example
//!
//! ```rust
//! use synthetic_source::{SyntheticGenerator, SyntheticSourceOptions};
//!
//! let options = SyntheticSourceOptions::from_json_str(
//!     r#"{"numRecords": 3, "keySizeBytes": 10, "valueSizeBytes": 90}"#,
//! ).unwrap();
//!
//! let mut generator = SyntheticGenerator::new(options);
//! let records: Vec<_> = generator.all_records().collect();
//! assert_eq!(records.len(), 3);
//! assert_eq!(records[0].key.len(), 10);
//! ```

pub mod error;
pub mod generator;
pub mod options;
pub mod record;

pub use error::SourceError;
pub use generator::{SyntheticGenerator, SyntheticRecordIterator};
pub use options::SyntheticSourceOptions;
pub use record::SyntheticRecord;
