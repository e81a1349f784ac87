use crate::admin::partition_count;
use crate::codec::{decode_optional, KeyValueCodec};
use crate::config::ConsumerConfig;
use crate::error::Result;
use crate::record::KafkaRecord;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::BorrowedMessage;
use rdkafka::{Message, Offset, TopicPartitionList};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How long a read runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Stop after `max_records` records.
    Bounded { max_records: u64 },
    /// Read until cancelled.
    Unbounded,
}

/// Metrics from a read run.
#[derive(Debug, Clone, Default)]
pub struct ReadMetrics {
    pub records_read: u64,
    /// Partitions assigned when the read stopped.
    pub partitions_assigned: usize,
    pub total_duration: Duration,
}

impl ReadMetrics {
    pub fn records_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.records_read as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Typed consumer for one topic.
///
/// The reader assigns partitions itself instead of joining a consumer group
/// rebalance, and starts every partition from its earliest offset. With
/// partition discovery enabled, topic metadata is refreshed on an interval and
/// partitions that appear are added to the assignment while positions on the
/// existing ones are kept.
pub struct KafkaReader<K, V> {
    config: ConsumerConfig,
    topic: String,
    mode: ReadMode,
    discovery_interval: Option<Duration>,
    _codec: PhantomData<fn() -> (K, V)>,
}

enum Step<K, V> {
    Stop,
    Refresh,
    Record(KafkaRecord<K, V>),
    Skip,
}

impl<K: KeyValueCodec, V: KeyValueCodec> KafkaReader<K, V> {
    pub fn new(config: ConsumerConfig, topic: impl Into<String>, mode: ReadMode) -> Self {
        Self {
            config,
            topic: topic.into(),
            mode,
            discovery_interval: None,
            _codec: PhantomData,
        }
    }

    pub fn with_partition_discovery(mut self, interval: Duration) -> Self {
        self.discovery_interval = Some(interval);
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Consume records, handing each one to `on_record`.
    ///
    /// Returns when the bounded count is reached or `cancel` fires. Decode
    /// failures end the read with an error; transient consumer errors are
    /// logged and the read continues.
    pub async fn read<F>(&self, cancel: &CancellationToken, mut on_record: F) -> Result<ReadMetrics>
    where
        F: FnMut(KafkaRecord<K, V>),
    {
        let start = Instant::now();
        let mut metrics = ReadMetrics::default();

        if self.mode == (ReadMode::Bounded { max_records: 0 }) {
            return Ok(metrics);
        }

        let consumer: StreamConsumer = self.config.client_config().create()?;
        let mut positions: BTreeMap<i32, Offset> = BTreeMap::new();

        match self.refresh_assignment(&consumer, &mut positions).await {
            Ok(()) => {}
            // The topic may not be visible yet; discovery will pick it up.
            Err(e) if self.discovery_interval.is_some() => {
                warn!("Initial metadata fetch for '{}' failed: {e}", self.topic)
            }
            Err(e) => return Err(e),
        }

        let mut ticker = self.discovery_interval.map(|period| {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            let step: Step<K, V> = tokio::select! {
                biased;
                _ = cancel.cancelled() => Step::Stop,
                _ = next_tick(&mut ticker) => Step::Refresh,
                message = consumer.recv() => match message {
                    Ok(message) => Step::Record(to_record(&message)?),
                    Err(e) => {
                        warn!("Consumer error on '{}': {e}", self.topic);
                        Step::Skip
                    }
                },
            };

            match step {
                Step::Stop => {
                    debug!("Read of '{}' cancelled", self.topic);
                    break;
                }
                Step::Refresh => {
                    if let Err(e) = self.refresh_assignment(&consumer, &mut positions).await {
                        warn!("Partition discovery for '{}' failed: {e}", self.topic);
                    }
                }
                Step::Record(record) => {
                    positions.insert(record.partition, Offset::Offset(record.offset + 1));
                    on_record(record);
                    metrics.records_read += 1;

                    if let ReadMode::Bounded { max_records } = self.mode {
                        if metrics.records_read >= max_records {
                            break;
                        }
                    }
                }
                Step::Skip => {}
            }
        }

        metrics.partitions_assigned = positions.len();
        metrics.total_duration = start.elapsed();
        info!(
            "Read {} records from '{}' across {} partition(s) in {:?}",
            metrics.records_read, self.topic, metrics.partitions_assigned, metrics.total_duration
        );
        Ok(metrics)
    }

    /// Assign any partitions not yet in `positions`, keeping existing ones at
    /// their next offset.
    async fn refresh_assignment(
        &self,
        consumer: &StreamConsumer,
        positions: &mut BTreeMap<i32, Offset>,
    ) -> Result<()> {
        let count = partition_count(&self.config.brokers, &self.topic).await?;
        let count = i32::try_from(count).unwrap_or(i32::MAX);

        if count as usize <= positions.len() {
            return Ok(());
        }

        let added: Vec<i32> = (0..count).filter(|p| !positions.contains_key(p)).collect();
        for partition in &added {
            positions.insert(*partition, Offset::Beginning);
        }

        let mut assignment = TopicPartitionList::new();
        for (partition, offset) in positions.iter() {
            assignment.add_partition_offset(&self.topic, *partition, *offset)?;
        }
        consumer.assign(&assignment)?;

        info!(
            "Assigned {} partition(s) of '{}' (new: {added:?})",
            positions.len(),
            self.topic
        );
        Ok(())
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn to_record<K: KeyValueCodec, V: KeyValueCodec>(
    message: &BorrowedMessage<'_>,
) -> Result<KafkaRecord<K, V>> {
    Ok(KafkaRecord {
        topic: message.topic().to_string(),
        partition: message.partition(),
        offset: message.offset(),
        timestamp: message.timestamp().to_millis(),
        key: decode_optional(message.key())?,
        value: decode_optional(message.payload())?,
    })
}
