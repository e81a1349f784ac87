//! Partition discovery while a read is running.
//!
//! A one-partition topic receives records 0..100. A background task waits,
//! grows the topic to two partitions and writes records 100..200 with a fresh
//! producer. Meanwhile a read with periodic partition discovery collects the
//! partitions it sees records from; both partitions must show up.

use super::{ensure_done, ensure_not_failed};
use crate::harness::Harness;
use crate::report::ScenarioReport;
use crate::stages::{write_stage, WriteSchedule};
use anyhow::Context;
use kafka_io::{ConsumerConfig, KafkaReader, ProducerConfig, ProducerRecord, ReadMode, TopicAdmin};
use pipeline::{cancel_if_timed_out, Pipeline};
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

const FIRST_BATCH: Range<i32> = 0..100;
const SECOND_BATCH: Range<i32> = 100..200;

/// Timing of the scenario.
#[derive(Debug, Clone, Copy)]
pub struct DynamicPartitionsConfig {
    /// Delay before the topic is grown and the second batch written.
    pub expansion_delay: Duration,
    /// How often the reader refreshes topic metadata.
    pub discovery_interval: Duration,
    /// Bound on each of the two writes.
    pub write_timeout: Duration,
}

impl Default for DynamicPartitionsConfig {
    fn default() -> Self {
        Self {
            expansion_delay: Duration::from_secs(20),
            discovery_interval: Duration::from_secs(5),
            write_timeout: Duration::from_secs(15),
        }
    }
}

pub fn topic() -> String {
    format!("DynamicTopicPartition-{}", Uuid::new_v4())
}

fn int_records(range: Range<i32>) -> impl Iterator<Item = ProducerRecord<i32, String>> + Send {
    range.map(|i| ProducerRecord::new(i, i.to_string()))
}

pub async fn run(harness: &Harness, topic: &str, report: &mut ScenarioReport) -> anyhow::Result<()> {
    run_with(harness, topic, DynamicPartitionsConfig::default(), report).await
}

/// Run with explicit timing. The topic is deleted afterwards whatever the
/// outcome; a failed deletion only fails a run that otherwise passed.
pub async fn run_with(
    harness: &Harness,
    topic: &str,
    config: DynamicPartitionsConfig,
    report: &mut ScenarioReport,
) -> anyhow::Result<()> {
    let admin = harness.broker().admin()?;
    admin
        .create_topic(topic, 1, 1)
        .await
        .with_context(|| format!("failed to create topic '{topic}'"))?;

    let outcome = exercise(harness, topic, config, report).await;
    let cleanup = admin.delete_topics(&[topic]).await;

    let passed = outcome.is_ok() && report.checks.iter().all(|c| c.passed);
    match cleanup {
        Ok(()) => info!("Deleted topic '{topic}'"),
        Err(e) if passed => {
            return Err(e).with_context(|| format!("failed to delete topic '{topic}'"));
        }
        Err(e) => warn!("Failed to delete topic '{topic}': {e}"),
    }
    outcome
}

async fn exercise(
    harness: &Harness,
    topic: &str,
    config: DynamicPartitionsConfig,
    report: &mut ScenarioReport,
) -> anyhow::Result<()> {
    let broker = harness.broker();

    let mut first = write_stage(
        broker.producer_config(),
        topic,
        int_records(FIRST_BATCH),
        WriteSchedule::default(),
    );
    let state = first.wait_until_finish_timeout(config.write_timeout).await;
    let state = cancel_if_timed_out(&mut first, state).await;
    ensure_done(&first, state)?;

    let expansion = spawn_expansion(
        broker.bootstrap_servers().to_string(),
        broker.producer_config(),
        topic.to_string(),
        config,
    );

    let observed = Arc::new(Mutex::new(BTreeSet::new()));
    let mut read = read_partitions(
        broker.consumer_config(&format!("{topic}-reader")),
        topic,
        config.discovery_interval,
        Arc::clone(&observed),
    );
    let state = read
        .wait_until_finish_timeout(harness.options().read_timeout() / 2)
        .await;
    let read_state = cancel_if_timed_out(&mut read, state).await;
    ensure_not_failed(&read, read_state)?;

    if expansion.is_finished() {
        expansion
            .await
            .context("partition expansion task panicked")?
            .context("partition expansion failed")?;
    } else {
        warn!("Partition expansion of '{topic}' still pending after the read, aborting it");
        expansion.abort();
    }

    let partitions: Vec<i32> = observed
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .iter()
        .copied()
        .collect();
    report.check("observed partitions", vec![0, 1], partitions);
    Ok(())
}

/// Unbounded read that records the partition of every record it sees.
fn read_partitions(
    config: ConsumerConfig,
    topic: &str,
    discovery_interval: Duration,
    observed: Arc<Mutex<BTreeSet<i32>>>,
) -> pipeline::PipelineResult<()> {
    let topic = topic.to_string();
    Pipeline::new(format!("read-{topic}")).run(move |ctx| async move {
        let reader = KafkaReader::<i32, String>::new(config, &topic, ReadMode::Unbounded)
            .with_partition_discovery(discovery_interval);
        reader
            .read(&ctx.cancellation_token(), |record| {
                observed
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(record.partition);
            })
            .await?;
        Ok(())
    })
}

/// After the configured delay, grow the topic to two partitions and write the
/// second batch with a new producer.
fn spawn_expansion(
    brokers: String,
    producer: ProducerConfig,
    topic: String,
    config: DynamicPartitionsConfig,
) -> JoinHandle<anyhow::Result<()>> {
    tokio::spawn(async move {
        tokio::time::sleep(config.expansion_delay).await;

        let admin = TopicAdmin::new(&brokers)?;
        admin.increase_partitions(&topic, 2).await?;

        let mut second = write_stage(
            producer,
            &topic,
            int_records(SECOND_BATCH),
            WriteSchedule::default(),
        );
        let state = second.wait_until_finish_timeout(config.write_timeout).await;
        let state = cancel_if_timed_out(&mut second, state).await;
        ensure_done(&second, state)
    })
}
