//! Deterministic generator for synthetic records.

use crate::options::SyntheticSourceOptions;
use crate::record::SyntheticRecord;
use sha2::{Digest, Sha256};

const KEY_DOMAIN: u8 = 0;
const VALUE_DOMAIN: u8 = 1;

/// Generator that produces deterministic synthetic records.
///
/// Record `i` depends only on the seed, `i` and the configured sizes, so any
/// index can be produced directly without generating its predecessors.
pub struct SyntheticGenerator {
    options: SyntheticSourceOptions,
    /// Index of the next record returned by `next_record`.
    index: u64,
}

impl SyntheticGenerator {
    pub fn new(options: SyntheticSourceOptions) -> Self {
        Self { options, index: 0 }
    }

    /// Set the starting index for incremental generation.
    pub fn with_start_index(mut self, index: u64) -> Self {
        self.index = index;
        self
    }

    pub fn current_index(&self) -> u64 {
        self.index
    }

    pub fn options(&self) -> &SyntheticSourceOptions {
        &self.options
    }

    /// Produce the record at `index` without moving the cursor.
    pub fn record_at(&self, index: u64) -> SyntheticRecord {
        let key = derive_bytes(self.options.seed, index, KEY_DOMAIN, self.options.key_size_bytes);
        let value = derive_bytes(
            self.options.seed,
            index,
            VALUE_DOMAIN,
            self.options.value_size_bytes,
        );
        SyntheticRecord::new(index, key, value)
    }

    /// Produce the record at the cursor and advance it.
    pub fn next_record(&mut self) -> SyntheticRecord {
        let record = self.record_at(self.index);
        self.index += 1;
        record
    }

    /// Lazily generate the next `count` records.
    pub fn records(&mut self, count: u64) -> SyntheticRecordIterator<'_> {
        SyntheticRecordIterator {
            generator: self,
            remaining: count,
        }
    }

    /// Lazily generate the configured `num_records`, starting from index 0.
    pub fn all_records(&mut self) -> SyntheticRecordIterator<'_> {
        self.index = 0;
        let count = self.options.num_records;
        self.records(count)
    }
}

/// Iterator that lazily generates synthetic records.
pub struct SyntheticRecordIterator<'a> {
    generator: &'a mut SyntheticGenerator,
    remaining: u64,
}

impl Iterator for SyntheticRecordIterator<'_> {
    type Item = SyntheticRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_record())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SyntheticRecordIterator<'_> {}

/// SHA-256 in counter mode over `(seed, index, domain, counter)`, truncated to `len`.
fn derive_bytes(seed: u64, index: u64, domain: u8, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len + 32);
    let mut counter: u32 = 0;
    while out.len() < len {
        let mut hasher = Sha256::new();
        hasher.update(seed.to_le_bytes());
        hasher.update(index.to_le_bytes());
        hasher.update([domain]);
        hasher.update(counter.to_le_bytes());
        out.extend_from_slice(&hasher.finalize());
        counter += 1;
    }
    out.truncate(len);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hundred_byte_options(count: u64) -> SyntheticSourceOptions {
        SyntheticSourceOptions::new(count).with_shape(10, 90)
    }

    #[test]
    fn test_record_shape() {
        let generator = SyntheticGenerator::new(hundred_byte_options(1));
        let record = generator.record_at(0);

        assert_eq!(record.index, 0);
        assert_eq!(record.key.len(), 10);
        assert_eq!(record.value.len(), 90);
        assert_eq!(record.byte_size(), 100);
    }

    #[test]
    fn test_known_first_record() {
        // Pinned so that stored expected hashes stay valid.
        let generator = SyntheticGenerator::new(hundred_byte_options(1));
        let record = generator.record_at(0);

        assert_eq!(hex::encode(&record.key), "b14046441435e0a4a4a6");
        assert!(hex::encode(&record.value).starts_with("b09eafbbdb20a6a22a89"));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut gen1 = SyntheticGenerator::new(hundred_byte_options(20));
        let mut gen2 = SyntheticGenerator::new(hundred_byte_options(20));

        let rows1: Vec<_> = gen1.all_records().collect();
        let rows2: Vec<_> = gen2.all_records().collect();

        assert_eq!(rows1, rows2);
    }

    #[test]
    fn test_seed_changes_output() {
        let gen1 = SyntheticGenerator::new(hundred_byte_options(1));
        let gen2 = SyntheticGenerator::new(hundred_byte_options(1).with_seed(7));

        assert_ne!(gen1.record_at(0), gen2.record_at(0));
    }

    #[test]
    fn test_key_and_value_streams_differ() {
        let options = SyntheticSourceOptions::new(1).with_shape(32, 32);
        let record = SyntheticGenerator::new(options).record_at(0);

        assert_ne!(record.key, record.value);
    }

    #[test]
    fn test_with_start_index() {
        let mut full = SyntheticGenerator::new(hundred_byte_options(10));
        let all: Vec<_> = full.all_records().collect();

        let mut resumed = SyntheticGenerator::new(hundred_byte_options(10)).with_start_index(5);
        let record = resumed.next_record();

        assert_eq!(record, all[5]);
        assert_eq!(resumed.current_index(), 6);
    }

    #[test]
    fn test_iterator_is_exact_size() {
        let mut generator = SyntheticGenerator::new(hundred_byte_options(7));
        let iter = generator.all_records();
        assert_eq!(iter.len(), 7);

        let indices: Vec<u64> = iter.map(|r| r.index).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_value() {
        let options = SyntheticSourceOptions::new(1).with_shape(4, 0);
        let record = SyntheticGenerator::new(options).record_at(3);
        assert_eq!(record.key.len(), 4);
        assert!(record.value.is_empty());
    }
}
