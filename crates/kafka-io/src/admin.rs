use crate::error::{Error, Result};
use rdkafka::admin::{AdminClient, AdminOptions, NewPartitions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::types::RDKafkaErrorCode;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info};

const ADMIN_TIMEOUT: Duration = Duration::from_secs(30);
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Administrative operations on topics of a single cluster.
pub struct TopicAdmin {
    client: AdminClient<DefaultClientContext>,
    brokers: String,
}

impl TopicAdmin {
    pub fn new(brokers: &str) -> Result<Self> {
        let client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;

        Ok(Self {
            client,
            brokers: brokers.to_string(),
        })
    }

    pub fn brokers(&self) -> &str {
        &self.brokers
    }

    fn options(&self) -> AdminOptions {
        AdminOptions::new().operation_timeout(Some(ADMIN_TIMEOUT))
    }

    /// Create a topic. An existing topic is left as is.
    pub async fn create_topic(&self, topic: &str, partitions: i32, replication: i32) -> Result<()> {
        let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(replication));

        let results = self
            .client
            .create_topics(&[new_topic], &self.options())
            .await
            .map_err(|e| Error::TopicCreation(format!("{topic}: {e}")))?;

        for result in results {
            match result {
                Ok(name) => info!("Topic '{name}' created with {partitions} partition(s)"),
                Err((name, RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("Topic '{name}' already exists")
                }
                Err((name, code)) => {
                    return Err(Error::TopicCreation(format!("{name}: {code}")));
                }
            }
        }
        Ok(())
    }

    /// Grow `topic` to `total_partitions` partitions.
    pub async fn increase_partitions(&self, topic: &str, total_partitions: usize) -> Result<()> {
        let request = NewPartitions::new(topic, total_partitions);

        let results = self
            .client
            .create_partitions(&[request], &self.options())
            .await
            .map_err(|e| Error::PartitionIncrease(format!("{topic}: {e}")))?;

        for result in results {
            if let Err((name, code)) = result {
                return Err(Error::PartitionIncrease(format!("{name}: {code}")));
            }
        }
        info!("Topic '{topic}' now has {total_partitions} partition(s)");
        Ok(())
    }

    /// Delete the given topics. Unknown topics are reported as errors.
    pub async fn delete_topics(&self, topics: &[&str]) -> Result<()> {
        if topics.is_empty() {
            return Ok(());
        }

        let results = self
            .client
            .delete_topics(topics, &self.options())
            .await
            .map_err(|e| Error::TopicDeletion(format!("{topics:?}: {e}")))?;

        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(name) => debug!("Topic '{name}' deleted"),
                Err((name, code)) => failures.push(format!("{name}: {code}")),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::TopicDeletion(failures.join(", ")))
        }
    }
}

/// Fetch the partition count of `topic` with a short-lived metadata client.
///
/// A fresh client is used on every call so that partitions added since the
/// last call are always visible.
pub(crate) async fn partition_count(brokers: &str, topic: &str) -> Result<usize> {
    let brokers = brokers.to_string();
    let topic = topic.to_string();

    tokio::task::spawn_blocking(move || {
        let consumer: BaseConsumer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .create()?;
        let metadata = consumer.fetch_metadata(Some(&topic), METADATA_TIMEOUT)?;

        let entry = metadata
            .topics()
            .iter()
            .find(|t| t.name() == topic)
            .ok_or_else(|| Error::Metadata(format!("topic '{topic}' missing from metadata")))?;

        if let Some(err) = entry.error() {
            return Err(Error::Metadata(format!(
                "topic '{topic}': {}",
                RDKafkaErrorCode::from(err)
            )));
        }
        Ok(entry.partitions().len())
    })
    .await
    .map_err(|e| Error::Task(format!("metadata task failed: {e}")))?
}
