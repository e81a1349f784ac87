//! Error types for the synthetic source.

use thiserror::Error;

/// Errors raised while loading or validating synthetic source options.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid source options JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid source options: {0}")]
    InvalidOptions(String),
}
