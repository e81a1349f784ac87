//! Order-independent aggregate hash over a dataset.
//!
//! Every element is hashed with SHA-256 and the digests are summed byte-wise
//! modulo 256, so the result does not depend on the order in which a parallel
//! reader delivers elements. Partial hashers can be merged.

use sha2::{Digest, Sha256};

const DIGEST_LEN: usize = 32;

/// Accumulator for the aggregate hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateHasher {
    acc: [u8; DIGEST_LEN],
    count: u64,
}

impl Default for AggregateHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateHasher {
    pub fn new() -> Self {
        Self {
            acc: [0; DIGEST_LEN],
            count: 0,
        }
    }

    pub fn add(&mut self, element: impl AsRef<[u8]>) {
        let digest = Sha256::digest(element.as_ref());
        for (a, d) in self.acc.iter_mut().zip(digest.iter()) {
            *a = a.wrapping_add(*d);
        }
        self.count += 1;
    }

    pub fn merge(&mut self, other: &AggregateHasher) {
        for (a, o) in self.acc.iter_mut().zip(other.acc.iter()) {
            *a = a.wrapping_add(*o);
        }
        self.count += other.count;
    }

    /// Number of elements added so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Hex digest, or `None` when nothing was added.
    pub fn finish(&self) -> Option<String> {
        (self.count > 0).then(|| hex::encode(self.acc))
    }
}

/// Aggregate hash of every element of `elements`.
pub fn hash_all<I>(elements: I) -> Option<String>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut hasher = AggregateHasher::new();
    for element in elements {
        hasher.add(element);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_hash() {
        assert_eq!(hash_all(Vec::<String>::new()), None);
    }

    #[test]
    fn test_single_element_is_its_digest() {
        let expected = hex::encode(Sha256::digest(b"abc"));
        assert_eq!(hash_all(["abc"]), Some(expected));
    }

    #[test]
    fn test_order_independent() {
        let a = hash_all(["one", "two", "three"]);
        let b = hash_all(["three", "one", "two"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_content_sensitive() {
        assert_ne!(hash_all(["one", "two"]), hash_all(["one", "tw0"]));
        // duplicates count
        assert_ne!(hash_all(["one"]), hash_all(["one", "one"]));
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let mut left = AggregateHasher::new();
        left.add("a");
        left.add("b");
        let mut right = AggregateHasher::new();
        right.add("c");

        left.merge(&right);

        assert_eq!(left.count(), 3);
        assert_eq!(left.finish(), hash_all(["a", "b", "c"]));
    }
}
