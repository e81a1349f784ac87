//! Helpers for tests that talk to a real broker.

use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique suffix for topic names, so repeated runs never read stale records.
pub fn generate_test_id() -> u64 {
    let timestamp = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default() as u64;
    let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    timestamp.wrapping_add(counter)
}

/// Broker for integration tests: `KAFKA_BROKERS`, else `localhost:9092`.
pub fn test_brokers() -> String {
    std::env::var("KAFKA_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = generate_test_id();
        let b = generate_test_id();
        assert_ne!(a, b);
    }
}
