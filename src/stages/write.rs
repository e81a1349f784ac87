use super::NAMESPACE;
use io_metrics::WRITE_TIME_METRIC;
use kafka_io::{
    KafkaWriter, KeyValueCodec, ProducerConfig, ProducerRecord, WriteMetrics, DEFAULT_BATCH_SIZE,
};
use pipeline::{Pipeline, PipelineResult, TimeMonitor};
use std::time::Duration;
use synthetic_source::{SyntheticGenerator, SyntheticSourceOptions};

/// How a write stage paces its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSchedule {
    /// Send `batch_size` records at a time, awaiting each batch's deliveries.
    Batched { batch_size: usize },
    /// Send one record every `interval`.
    Fixed { interval: Duration },
}

impl Default for WriteSchedule {
    fn default() -> Self {
        Self::Batched {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Every record of the synthetic dataset as a bytes/bytes producer record.
pub fn synthetic_records(
    options: SyntheticSourceOptions,
) -> impl Iterator<Item = ProducerRecord<Vec<u8>, Vec<u8>>> + Send + 'static {
    let num_records = options.num_records;
    let generator = SyntheticGenerator::new(options);
    (0..num_records).map(move |index| {
        let record = generator.record_at(index);
        ProducerRecord::new(record.key, record.value)
    })
}

/// Submit a pipeline that publishes `records` to `topic`, timing every record
/// into the `write_time` distribution.
pub fn write_stage<K, V, I>(
    config: ProducerConfig,
    topic: impl Into<String>,
    records: I,
    schedule: WriteSchedule,
) -> PipelineResult<WriteMetrics>
where
    K: KeyValueCodec,
    V: KeyValueCodec,
    I: IntoIterator<Item = ProducerRecord<K, V>> + Send + 'static,
    I::IntoIter: Send,
{
    let topic = topic.into();
    Pipeline::new(format!("write-{topic}")).run(move |ctx| async move {
        let monitor = TimeMonitor::new(ctx.metrics(), NAMESPACE, WRITE_TIME_METRIC);
        let writer = KafkaWriter::<K, V>::new(&config, &topic)?;
        let writer = match schedule {
            WriteSchedule::Batched { batch_size } => writer.with_batch_size(batch_size),
            WriteSchedule::Fixed { interval } => writer.with_publish_interval(interval),
        };
        let metrics = writer.write_all(records, |_| monitor.record()).await?;
        Ok(metrics)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_batched() {
        assert_eq!(
            WriteSchedule::default(),
            WriteSchedule::Batched {
                batch_size: DEFAULT_BATCH_SIZE
            }
        );
    }

    #[test]
    fn test_synthetic_records_match_generator() {
        let options = SyntheticSourceOptions::new(3).with_shape(10, 90);
        let mut generator = SyntheticGenerator::new(options.clone());

        let records: Vec<_> = synthetic_records(options).collect();
        assert_eq!(records.len(), 3);
        for (record, expected) in records.iter().zip(generator.all_records()) {
            assert_eq!(record.key.as_deref(), Some(expected.key.as_slice()));
            assert_eq!(record.value.as_deref(), Some(expected.value.as_slice()));
        }
    }
}
