//! The four round-trip scenarios.

pub mod batch;
pub mod dynamic_partitions;
pub mod null_roundtrip;
pub mod streaming;

use crate::harness::Harness;
use crate::report::ScenarioReport;
use crate::stages::NAMESPACE;
use anyhow::bail;
use clap::ValueEnum;
use io_metrics::read_io_metrics;
use pipeline::{PipelineResult, PipelineState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Scenario {
    /// Unbounded read, element count check
    Streaming,
    /// Bounded read, aggregate hash check
    Batch,
    /// One record with null key and value
    #[value(name = "null-roundtrip")]
    NullRoundTrip,
    /// Partitions added while a read is running
    DynamicPartitions,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Streaming,
        Scenario::Batch,
        Scenario::NullRoundTrip,
        Scenario::DynamicPartitions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Streaming => "streaming",
            Self::Batch => "batch",
            Self::NullRoundTrip => "null-roundtrip",
            Self::DynamicPartitions => "dynamic-partitions",
        }
    }

    /// Topic the scenario uses, derived from the configured base topic.
    pub fn topic(&self, base_topic: &str) -> String {
        match self {
            Self::Streaming => base_topic.to_string(),
            Self::Batch => format!("{base_topic}-batch"),
            Self::NullRoundTrip => format!("{base_topic}-nullRoundTrip"),
            Self::DynamicPartitions => dynamic_partitions::topic(),
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fail unless a write pipeline completed.
pub(crate) fn ensure_done<T>(result: &PipelineResult<T>, state: PipelineState) -> anyhow::Result<()> {
    if state != PipelineState::Done {
        bail!(
            "pipeline '{}' ended in state {state}: {}",
            result.name(),
            result.error().unwrap_or("no error reported")
        );
    }
    Ok(())
}

/// Fail only if a read pipeline failed; a cancelled read still gets checked.
pub(crate) fn ensure_not_failed<T>(
    result: &PipelineResult<T>,
    state: PipelineState,
) -> anyhow::Result<()> {
    if state == PipelineState::Failed {
        bail!(
            "pipeline '{}' failed: {}",
            result.name(),
            result.error().unwrap_or("no error reported")
        );
    }
    Ok(())
}

/// Derive write/read/run time from a finished pair of runs and publish them.
pub(crate) async fn report_io_metrics<W, R>(
    harness: &Harness,
    write: &PipelineResult<W>,
    read: &PipelineResult<R>,
    report: &mut ScenarioReport,
) -> anyhow::Result<()> {
    let results = read_io_metrics(&write.metrics(), &read.metrics(), NAMESPACE, harness.identity());
    harness.publish(&results).await?;
    report.metrics = results;
    Ok(())
}
