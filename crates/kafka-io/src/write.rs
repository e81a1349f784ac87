use crate::codec::KeyValueCodec;
use crate::config::ProducerConfig;
use crate::error::{Error, Result};
use crate::record::ProducerRecord;
use futures::future::join_all;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Records per batch unless `with_batch_size` says otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 1000;
const QUEUE_TIMEOUT: Duration = Duration::from_secs(30);
const FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Metrics from a write run.
#[derive(Debug, Clone, Default)]
pub struct WriteMetrics {
    /// Number of messages acknowledged by the broker.
    pub messages_sent: u64,
    /// Number of batches sent.
    pub batch_count: u64,
    pub total_duration: Duration,
}

impl WriteMetrics {
    pub fn messages_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.messages_sent as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Typed producer bound to a single topic.
///
/// Records are published in batches whose deliveries are awaited before the
/// next batch is encoded. With a publish interval set, records are instead sent
/// one at a time on a fixed schedule.
pub struct KafkaWriter<K, V> {
    producer: FutureProducer,
    topic: String,
    batch_size: usize,
    publish_interval: Option<Duration>,
    _codec: PhantomData<fn(K, V)>,
}

impl<K: KeyValueCodec, V: KeyValueCodec> KafkaWriter<K, V> {
    pub fn new(config: &ProducerConfig, topic: impl Into<String>) -> Result<Self> {
        let producer: FutureProducer = config.client_config().create()?;
        Ok(Self {
            producer,
            topic: topic.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            publish_interval: None,
            _codec: PhantomData,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_publish_interval(mut self, interval: Duration) -> Self {
        self.publish_interval = Some(interval);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish every record, calling `on_sent` for each one before it is
    /// handed to the producer.
    ///
    /// Fails on the first delivery error. Returns after the producer queue
    /// has been flushed.
    pub async fn write_all<I, F>(&self, records: I, mut on_sent: F) -> Result<WriteMetrics>
    where
        I: IntoIterator<Item = ProducerRecord<K, V>>,
        F: FnMut(&ProducerRecord<K, V>),
    {
        let start = Instant::now();
        let mut metrics = WriteMetrics::default();
        let mut records = records.into_iter();

        match self.publish_interval {
            Some(interval) => {
                let mut ticker = tokio::time::interval(interval);
                for record in records {
                    ticker.tick().await;
                    on_sent(&record);
                    let encoded = encode(&record);
                    self.send_batch(std::slice::from_ref(&encoded)).await?;
                    metrics.messages_sent += 1;
                    metrics.batch_count += 1;
                }
            }
            None => loop {
                let batch: Vec<ProducerRecord<K, V>> =
                    records.by_ref().take(self.batch_size).collect();
                if batch.is_empty() {
                    break;
                }

                let encoded: Vec<_> = batch
                    .iter()
                    .map(|record| {
                        on_sent(record);
                        encode(record)
                    })
                    .collect();
                metrics.messages_sent += self.send_batch(&encoded).await?;
                metrics.batch_count += 1;
                debug!(
                    "Sent batch {} to '{}' ({} messages so far)",
                    metrics.batch_count, self.topic, metrics.messages_sent
                );
            },
        }

        self.flush().await?;
        metrics.total_duration = start.elapsed();

        info!(
            "Wrote {} messages to '{}' in {:?} ({:.0} msg/s)",
            metrics.messages_sent,
            self.topic,
            metrics.total_duration,
            metrics.messages_per_second()
        );
        Ok(metrics)
    }

    async fn send_batch(&self, encoded: &[EncodedRecord]) -> Result<u64> {
        let sends = encoded.iter().map(|(key, payload)| {
            let mut record = FutureRecord::<[u8], [u8]>::to(&self.topic);
            if let Some(key) = key {
                record = record.key(key.as_slice());
            }
            if let Some(payload) = payload {
                record = record.payload(payload.as_slice());
            }
            self.producer.send(record, QUEUE_TIMEOUT)
        });

        let mut delivered = 0u64;
        for outcome in join_all(sends).await {
            outcome.map_err(|(err, _)| Error::Kafka(err))?;
            delivered += 1;
        }
        Ok(delivered)
    }

    async fn flush(&self) -> Result<()> {
        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(FLUSH_TIMEOUT))
            .await
            .map_err(|e| Error::Task(format!("flush task failed: {e}")))??;
        Ok(())
    }
}

type EncodedRecord = (Option<Vec<u8>>, Option<Vec<u8>>);

fn encode<K: KeyValueCodec, V: KeyValueCodec>(record: &ProducerRecord<K, V>) -> EncodedRecord {
    (
        record.key.as_ref().map(|key| key.encode()),
        record.value.as_ref().map(|value| value.encode()),
    )
}
