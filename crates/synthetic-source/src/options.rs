//! Source options parsed from the `--source-options` JSON blob.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};

/// Seed used when the options blob does not carry one.
pub const DEFAULT_SEED: u64 = 42;

/// Shape and size of the synthetic dataset.
///
/// Field names follow the camelCase keys of the JSON blob, e.g.
/// `{"numRecords": 1000, "keySizeBytes": 10, "valueSizeBytes": 90}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SyntheticSourceOptions {
    /// Number of records the source produces.
    pub num_records: u64,
    /// Size of every generated key.
    #[serde(default = "default_key_size")]
    pub key_size_bytes: usize,
    /// Size of every generated value.
    #[serde(default = "default_value_size")]
    pub value_size_bytes: usize,
    /// Seed for the byte streams (same seed = same records).
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_key_size() -> usize {
    1
}

fn default_value_size() -> usize {
    1
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl SyntheticSourceOptions {
    /// Create options for `num_records` records with the default shape.
    pub fn new(num_records: u64) -> Self {
        Self {
            num_records,
            key_size_bytes: default_key_size(),
            value_size_bytes: default_value_size(),
            seed: DEFAULT_SEED,
        }
    }

    /// Set key and value sizes.
    pub fn with_shape(mut self, key_size_bytes: usize, value_size_bytes: usize) -> Self {
        self.key_size_bytes = key_size_bytes;
        self.value_size_bytes = value_size_bytes;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse and validate options from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check the invariants the generator relies on.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.key_size_bytes == 0 {
            return Err(SourceError::InvalidOptions(
                "keySizeBytes should be a positive number, but found 0".to_string(),
            ));
        }
        Ok(())
    }
}
