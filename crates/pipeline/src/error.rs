//! Error types for the pipeline runtime.

use thiserror::Error;

/// Errors surfaced by a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The pipeline body returned an error or its task panicked.
    #[error("Pipeline '{pipeline}' failed: {message}")]
    Failed { pipeline: String, message: String },

    /// The pipeline was cancelled before producing output.
    #[error("Pipeline '{0}' was cancelled")]
    Cancelled(String),

    /// Output was requested before the pipeline finished.
    #[error("Pipeline '{0}' has not finished")]
    NotFinished(String),
}
