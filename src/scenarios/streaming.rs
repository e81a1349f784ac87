use super::{ensure_done, ensure_not_failed, report_io_metrics};
use crate::harness::Harness;
use crate::report::ScenarioReport;
use crate::stages::{read_stage, synthetic_records, write_stage, ReadSink, NAMESPACE};
use io_metrics::{MetricsReader, READ_ELEMENT_COUNT_METRIC};
use kafka_io::ReadMode;
use pipeline::cancel_if_timed_out;

/// Write the synthetic dataset, then count it back with an unbounded read that
/// is cancelled once the read timeout elapses.
pub async fn run(harness: &Harness, topic: &str, report: &mut ScenarioReport) -> anyhow::Result<()> {
    let options = harness.options();
    let source = options.source_options.clone();
    let broker = harness.broker();

    let mut write = write_stage(
        broker.producer_config(),
        topic,
        synthetic_records(source.clone()),
        options.write_schedule(),
    );
    let write_state = write.wait_until_finish().await;
    ensure_done(&write, write_state)?;

    let mut read = read_stage(
        broker.consumer_config(&format!("{topic}-streaming-reader")),
        topic,
        ReadMode::Unbounded,
        ReadSink::Count,
    );
    let state = read.wait_until_finish_timeout(options.read_timeout()).await;
    let read_state = cancel_if_timed_out(&mut read, state).await;
    ensure_not_failed(&read, read_state)?;

    let read_metrics = read.metrics();
    let count = MetricsReader::new(&read_metrics, NAMESPACE).counter(READ_ELEMENT_COUNT_METRIC);
    report.check("read element count", source.num_records as i64, count);

    report_io_metrics(harness, &write, &read, report).await
}
