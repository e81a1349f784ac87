use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),

    #[error("Partition increase error: {0}")]
    PartitionIncrease(String),

    #[error("Topic deletion error: {0}")]
    TopicDeletion(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Background task error: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, Error>;
