use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("InfluxDB rejected the write with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid InfluxDB settings: {0}")]
    InvalidSettings(String),
}
