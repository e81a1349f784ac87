//! Minimal pipeline runtime used by the kafka-io-it harness.
//!
//! A pipeline is an async body submitted to the tokio runtime. The caller gets a
//! [`PipelineResult`] back and interacts with the run only through a narrow
//! interface: wait (optionally bounded), cancel, read metrics, take the output.
//!
//! ```text
//! Pipeline::new("read")
//!     .run(|ctx| async move { ... })      // spawned immediately
//!        │
//!        ▼
//! PipelineResult<T>
//!   - wait_until_finish()                 -> PipelineState
//!   - wait_until_finish_timeout(d)        -> Option<PipelineState>
//!   - cancel()                            -> PipelineState
//!   - metrics()                           -> MetricResults
//! ```
//!
//! Metrics are recorded through the [`PipelineContext`] handed to the body and
//! are only read after the run has reached a terminal state (or was cancelled).

pub mod error;
pub mod hashing;
pub mod metrics;
pub mod monitor;
pub mod result;
pub mod state;

pub use error::PipelineError;
pub use hashing::{hash_all, AggregateHasher};
pub use metrics::{
    Counter, Distribution, DistributionResult, MetricName, MetricResults, MetricsContainer,
};
pub use monitor::TimeMonitor;
pub use result::{cancel_if_timed_out, Pipeline, PipelineContext, PipelineResult};
pub use state::PipelineState;
