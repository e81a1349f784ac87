use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Invalid source options: {0}")]
    SourceOptions(#[from] synthetic_source::SourceError),

    #[error("No expected hash is known for {0} records")]
    UnsupportedRecordCount(u64),

    #[error(
        "No expected hash is known for {key_size_bytes}-byte keys and {value_size_bytes}-byte values with seed {seed}"
    )]
    UnsupportedDataset {
        key_size_bytes: usize,
        value_size_bytes: usize,
        seed: u64,
    },

    #[error("Kafka error: {0}")]
    Kafka(#[from] kafka_io::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] io_metrics::MetricsError),

    #[error("Broker environment error: {0}")]
    Broker(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}
