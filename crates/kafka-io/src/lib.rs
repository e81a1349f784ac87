//! Kafka plumbing for the kafka-io-it harness.
//!
//! Features:
//!
//! - Typed keys and values: raw bytes, UTF-8 strings and big-endian `i32`, with
//!   absent keys/payloads kept distinct from empty ones
//! - Writer: batched or fixed-schedule publishing with delivery confirmation
//! - Reader: bounded or unbounded consumption from the earliest offset, with
//!   optional discovery of partitions added while the read is running
//! - Topic admin: create, grow and delete topics

/// Serialization of keys and values
pub mod codec;
pub mod config;
pub mod error;
pub mod record;

/// Topic creation, partition increase and deletion
pub mod admin;

/// Partition-assigning consumer with periodic metadata refresh
pub mod read;

/// Producer wrapper that waits for every delivery report
pub mod write;

pub use admin::TopicAdmin;
pub use codec::KeyValueCodec;
pub use config::{ConsumerConfig, ProducerConfig};
pub use error::{Error, Result};
pub use read::{KafkaReader, ReadMetrics, ReadMode};
pub use record::{KafkaRecord, ProducerRecord};
pub use write::{KafkaWriter, WriteMetrics, DEFAULT_BATCH_SIZE};
