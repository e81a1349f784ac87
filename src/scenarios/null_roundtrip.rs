use super::{ensure_done, ensure_not_failed};
use crate::harness::Harness;
use crate::report::ScenarioReport;
use crate::stages::{read_stage, write_stage, ReadSink, WriteSchedule};
use kafka_io::{ProducerRecord, ReadMode};
use pipeline::cancel_if_timed_out;

/// Round-trip a single record whose key and value are both null.
pub async fn run(harness: &Harness, topic: &str, report: &mut ScenarioReport) -> anyhow::Result<()> {
    let broker = harness.broker();

    let record: ProducerRecord<Vec<u8>, Vec<u8>> = ProducerRecord::null();
    let mut write = write_stage(broker.producer_config(), topic, vec![record], WriteSchedule::default());
    let write_state = write.wait_until_finish().await;
    ensure_done(&write, write_state)?;

    let mut read = read_stage(
        broker.consumer_config(&format!("{topic}-reader")),
        topic,
        ReadMode::Bounded { max_records: 1 },
        ReadSink::Collect,
    );
    let state = read.wait_until_finish_timeout(harness.options().read_timeout()).await;
    let read_state = cancel_if_timed_out(&mut read, state).await;
    ensure_not_failed(&read, read_state)?;

    let records = read
        .output()
        .map(|outcome| outcome.records.clone())
        .unwrap_or_default();
    report.check("records read", 1usize, records.len());

    if let Some(record) = records.first() {
        report.check("key", None::<Vec<u8>>, record.key.clone());
        report.check("value", None::<Vec<u8>>, record.value.clone());
    }
    Ok(())
}
