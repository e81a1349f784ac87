//! Command-line interface for kafka-io-it
//!
//! ```bash
//! # Every scenario against an existing cluster
//! kafka-io-it run all \
//!   --source-options '{"numRecords":1000,"keySizeBytes":10,"valueSizeBytes":90}' \
//!   --kafka-topic beam --read-timeout 900
//!
//! # Batch scenario against a throwaway container, built with --features testcontainers
//! kafka-io-it run batch --with-testcontainers \
//!   --source-options '{"numRecords":1000,"keySizeBytes":10,"valueSizeBytes":90}' \
//!   --kafka-topic beam --read-timeout 120
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use kafka_io_it::{Harness, HarnessOptions, Scenario};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "kafka-io-it")]
#[command(about = "Write/read round-trip integration tests for Kafka IO")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario or all of them
    Run {
        /// streaming, batch, null-roundtrip, dynamic-partitions or all
        scenario: Selection,

        #[command(flatten)]
        options: HarnessOptions,
    },
}

/// A single scenario, or every scenario in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Selection {
    One(Scenario),
    All,
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "all" {
            return Ok(Selection::All);
        }
        Scenario::from_str(value, false).map(Selection::One)
    }
}

impl Selection {
    fn scenarios(self) -> Vec<Scenario> {
        match self {
            Selection::One(scenario) => vec![scenario],
            Selection::All => Scenario::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, options } => {
            let harness = Harness::start(options).await?;
            let reports = harness.run_all(&scenario.scenarios()).await;

            for report in &reports {
                println!("{}", report.summary());
            }

            let failed: Vec<&str> = reports
                .iter()
                .filter(|r| !r.passed())
                .map(|r| r.scenario.as_str())
                .collect();
            if !failed.is_empty() {
                anyhow::bail!("scenario(s) failed: {}", failed.join(", "));
            }
        }
    }

    Ok(())
}
