/// A record to publish. Either side may be absent (null on the wire).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerRecord<K, V> {
    pub key: Option<K>,
    pub value: Option<V>,
}

impl<K, V> ProducerRecord<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self {
            key: Some(key),
            value: Some(value),
        }
    }

    /// Record with a null key and a null value.
    pub fn null() -> Self {
        Self {
            key: None,
            value: None,
        }
    }
}

/// A consumed record with its broker metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaRecord<K, V> {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Message timestamp (milliseconds since epoch)
    pub timestamp: Option<i64>,
    pub key: Option<K>,
    pub value: Option<V>,
}
