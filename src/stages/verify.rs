use crate::error::HarnessError;
use kafka_io::KafkaRecord;
use synthetic_source::SyntheticSourceOptions;

/// Dataset shape the hash table was computed for.
pub const HASHED_KEY_SIZE_BYTES: usize = 10;
pub const HASHED_VALUE_SIZE_BYTES: usize = 90;
pub const HASHED_SEED: u64 = 42;

/// Aggregate hash of the synthetic dataset (10-byte keys, 90-byte values,
/// seed 42) for each supported record count.
pub const EXPECTED_HASHES: &[(u64, &str)] = &[
    (
        1_000,
        "6958a290b18692da01302f623b687ee9ac3c52e2772a14e269f13be2877be7b1",
    ),
    (
        10_000,
        "d2fd4bdc444f80b4d6c58b9b99ab2ed8ef5df7b2ae500b32f1708c0b112db0eb",
    ),
    (
        100_000,
        "25c555c402a0fdf639b18893745b3b28d8eee64d0b33eeef06de4b93675aa6cb",
    ),
    (
        1_000_000,
        "2b8a938fe6dc35b2e69827a2dcb82becd5640a432e4f3f09eb9dc654c64a8e79",
    ),
];

/// Expected aggregate hash of the dataset `options` describes.
///
/// Fails when the shape or seed differs from the one the table was computed
/// for, or when the record count is not in the table.
pub fn expected_hash_for(options: &SyntheticSourceOptions) -> Result<&'static str, HarnessError> {
    if options.key_size_bytes != HASHED_KEY_SIZE_BYTES
        || options.value_size_bytes != HASHED_VALUE_SIZE_BYTES
        || options.seed != HASHED_SEED
    {
        return Err(HarnessError::UnsupportedDataset {
            key_size_bytes: options.key_size_bytes,
            value_size_bytes: options.value_size_bytes,
            seed: options.seed,
        });
    }

    EXPECTED_HASHES
        .iter()
        .find(|(count, _)| *count == options.num_records)
        .map(|(_, hash)| *hash)
        .ok_or(HarnessError::UnsupportedRecordCount(options.num_records))
}

/// `"<hex key> <hex value>"`, with `null` standing in for an absent side.
pub fn record_to_string(record: &KafkaRecord<Vec<u8>, Vec<u8>>) -> String {
    fn field(bytes: &Option<Vec<u8>>) -> String {
        bytes.as_ref().map_or_else(|| "null".to_string(), hex::encode)
    }
    format!("{} {}", field(&record.key), field(&record.value))
}
