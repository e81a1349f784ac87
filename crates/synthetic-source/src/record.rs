/// A generated key/value record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRecord {
    /// Position of the record in the dataset.
    pub index: u64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl SyntheticRecord {
    pub fn new(index: u64, key: Vec<u8>, value: Vec<u8>) -> Self {
        Self { index, key, value }
    }

    /// Key plus value size.
    pub fn byte_size(&self) -> usize {
        self.key.len() + self.value.len()
    }
}
