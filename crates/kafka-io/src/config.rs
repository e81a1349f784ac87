use rdkafka::config::ClientConfig;
use std::collections::BTreeMap;

/// Configuration for the Kafka producer.
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Kafka brokers (comma-separated list)
    pub brokers: String,
    /// Local delivery timeout in milliseconds
    pub message_timeout_ms: String,
    pub linger_ms: String,
    /// Raw librdkafka properties applied last
    pub config_updates: BTreeMap<String, String>,
}

impl ProducerConfig {
    pub fn new(brokers: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            ..Self::default()
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("message.timeout.ms", &self.message_timeout_ms)
            .set("queue.buffering.max.messages", "100000")
            .set("linger.ms", &self.linger_ms);
        for (key, value) in &self.config_updates {
            config.set(key, value);
        }
        config
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            message_timeout_ms: "30000".to_string(),
            linger_ms: "5".to_string(),
            config_updates: BTreeMap::new(),
        }
    }
}

/// Configuration for the Kafka consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Kafka brokers (comma-separated list)
    pub brokers: String,
    /// Consumer group ID
    ///
    /// The reader assigns partitions itself and never commits, so the group
    /// only identifies the client to the broker.
    pub group_id: String,
    /// Auto offset reset strategy ("earliest" or "latest")
    ///
    /// Only consulted when an explicit position is invalid; the reader always
    /// starts newly assigned partitions from the beginning.
    pub auto_offset_reset: String,
    /// Session timeout in milliseconds
    pub session_timeout_ms: String,
    /// Raw librdkafka properties applied last
    pub config_updates: BTreeMap<String, String>,
}

impl ConsumerConfig {
    pub fn new(brokers: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            group_id: group_id.into(),
            ..Self::default()
        }
    }

    pub fn with_config_update(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_updates.insert(key.into(), value.into());
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", &self.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", &self.auto_offset_reset)
            .set("session.timeout.ms", &self.session_timeout_ms)
            .set("enable.partition.eof", "false");
        for (key, value) in &self.config_updates {
            config.set(key, value);
        }
        config
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            group_id: "kafka-io-it-reader".to_string(),
            auto_offset_reset: "earliest".to_string(),
            session_timeout_ms: "6000".to_string(),
            config_updates: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consumer_defaults() {
        let config = ConsumerConfig::new("kafka:9092", "group-1").client_config();

        assert_eq!(config.get("bootstrap.servers"), Some("kafka:9092"));
        assert_eq!(config.get("group.id"), Some("group-1"));
        assert_eq!(config.get("auto.offset.reset"), Some("earliest"));
        assert_eq!(config.get("enable.auto.commit"), Some("false"));
    }

    #[test]
    fn test_config_updates_win() {
        let config = ConsumerConfig::new("kafka:9092", "g")
            .with_config_update("auto.offset.reset", "latest")
            .with_config_update("fetch.min.bytes", "1")
            .client_config();

        assert_eq!(config.get("auto.offset.reset"), Some("latest"));
        assert_eq!(config.get("fetch.min.bytes"), Some("1"));
    }

    #[test]
    fn test_producer_config() {
        let mut producer = ProducerConfig::new("a:1,b:2");
        producer
            .config_updates
            .insert("acks".to_string(), "all".to_string());
        let config = producer.client_config();

        assert_eq!(config.get("bootstrap.servers"), Some("a:1,b:2"));
        assert_eq!(config.get("message.timeout.ms"), Some("30000"));
        assert_eq!(config.get("acks"), Some("all"));
    }
}
