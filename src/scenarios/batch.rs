use super::{ensure_done, ensure_not_failed, report_io_metrics};
use crate::harness::Harness;
use crate::report::ScenarioReport;
use crate::stages::{expected_hash_for, read_stage, synthetic_records, write_stage, ReadSink};
use kafka_io::ReadMode;
use pipeline::{cancel_if_timed_out, PipelineState};

/// Write the synthetic dataset and read exactly that many records back,
/// comparing their aggregate hash with the precomputed one.
pub async fn run(harness: &Harness, topic: &str, report: &mut ScenarioReport) -> anyhow::Result<()> {
    let options = harness.options();
    let source = options.source_options.clone();
    let broker = harness.broker();

    // Checked before anything is written.
    let expected = expected_hash_for(&source)?;

    let mut write = write_stage(
        broker.producer_config(),
        topic,
        synthetic_records(source.clone()),
        options.write_schedule(),
    );
    let write_state = write.wait_until_finish().await;
    ensure_done(&write, write_state)?;

    let mut read = read_stage(
        broker.consumer_config(&format!("{topic}-batch-reader")),
        topic,
        ReadMode::Bounded {
            max_records: source.num_records,
        },
        ReadSink::Hash,
    );
    let state = read.wait_until_finish_timeout(options.read_timeout()).await;
    let read_state = cancel_if_timed_out(&mut read, state).await;
    ensure_not_failed(&read, read_state)?;

    let actual = match read_state {
        PipelineState::Done => read.output().and_then(|outcome| outcome.hash.clone()),
        _ => None,
    };
    report.check("aggregate hash", Some(expected.to_string()), actual);

    report_io_metrics(harness, &write, &read, report).await
}
