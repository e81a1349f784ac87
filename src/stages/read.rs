use super::verify::record_to_string;
use super::NAMESPACE;
use io_metrics::{READ_ELEMENT_COUNT_METRIC, READ_TIME_METRIC};
use kafka_io::{ConsumerConfig, KafkaReader, KafkaRecord, ReadMetrics, ReadMode};
use pipeline::{AggregateHasher, Pipeline, PipelineResult, TimeMonitor};

/// What the read stage does with each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadSink {
    /// Increment the `kafka_read_element_count` counter.
    Count,
    /// Fold the record's string form into an aggregate hash.
    Hash,
    /// Keep every record.
    Collect,
}

/// Output of a read pipeline that ran to completion.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub metrics: ReadMetrics,
    /// Aggregate hash for [`ReadSink::Hash`]; `None` when nothing was read.
    pub hash: Option<String>,
    /// Records kept by [`ReadSink::Collect`].
    pub records: Vec<KafkaRecord<Vec<u8>, Vec<u8>>>,
}

/// Submit a pipeline that reads bytes/bytes records from `topic` starting at
/// the earliest offset.
pub fn read_stage(
    config: ConsumerConfig,
    topic: impl Into<String>,
    mode: ReadMode,
    sink: ReadSink,
) -> PipelineResult<ReadOutcome> {
    let topic = topic.into();
    Pipeline::new(format!("read-{topic}")).run(move |ctx| async move {
        let monitor = TimeMonitor::new(ctx.metrics(), NAMESPACE, READ_TIME_METRIC);
        let counter = ctx.metrics().counter(NAMESPACE, READ_ELEMENT_COUNT_METRIC);
        let mut hasher = AggregateHasher::new();
        let mut records = Vec::new();

        let reader = KafkaReader::<Vec<u8>, Vec<u8>>::new(config, &topic, mode);
        let metrics = reader
            .read(&ctx.cancellation_token(), |record| {
                monitor.record();
                match sink {
                    ReadSink::Count => counter.inc(),
                    ReadSink::Hash => hasher.add(record_to_string(&record)),
                    ReadSink::Collect => records.push(record),
                }
            })
            .await?;

        let hash = match sink {
            ReadSink::Hash => hasher.finish(),
            ReadSink::Count | ReadSink::Collect => None,
        };
        Ok(ReadOutcome {
            metrics,
            hash,
            records,
        })
    })
}
