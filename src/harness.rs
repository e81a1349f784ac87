//! Per-process harness state shared by all scenarios.

use crate::broker::BrokerEnvironment;
use crate::error::HarnessError;
use crate::options::HarnessOptions;
use crate::report::ScenarioReport;
use crate::scenarios::{self, Scenario};
use io_metrics::{InfluxDbPublisher, NamedTestResult, RunIdentity};
use std::time::Instant;
use tracing::{debug, error, info};

pub struct Harness {
    options: HarnessOptions,
    identity: RunIdentity,
    broker: BrokerEnvironment,
    publisher: Option<InfluxDbPublisher>,
}

impl Harness {
    /// Validate options, bring up the broker environment and set up publishing.
    pub async fn start(options: HarnessOptions) -> Result<Self, HarnessError> {
        options.validate()?;
        let broker = BrokerEnvironment::start(&options).await?;
        Self::with_broker(options, broker)
    }

    /// Use an already prepared broker environment.
    pub fn with_broker(
        options: HarnessOptions,
        broker: BrokerEnvironment,
    ) -> Result<Self, HarnessError> {
        let publisher = match options.influx_settings()? {
            Some(_) if broker.uses_container() => {
                info!("Running against a test container, metrics will not be published");
                None
            }
            Some(settings) => Some(InfluxDbPublisher::new(settings)?),
            None => None,
        };

        let identity = RunIdentity::new();
        info!("Test run {} started at {}", identity.test_id, identity.timestamp);

        Ok(Self {
            options,
            identity,
            broker,
            publisher,
        })
    }

    pub fn options(&self) -> &HarnessOptions {
        &self.options
    }

    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    pub fn broker(&self) -> &BrokerEnvironment {
        &self.broker
    }

    pub fn publishes_metrics(&self) -> bool {
        self.publisher.is_some()
    }

    /// Publish results when a publisher is configured; otherwise only log them.
    pub async fn publish(&self, results: &[NamedTestResult]) -> Result<(), HarnessError> {
        match &self.publisher {
            Some(publisher) => Ok(publisher.publish(results).await?),
            None => {
                for result in results {
                    debug!("{} = {}", result.metric, result.value);
                }
                Ok(())
            }
        }
    }

    /// Run one scenario to a report. Errors become an `Error` status.
    pub async fn run(&self, scenario: Scenario) -> ScenarioReport {
        let topic = scenario.topic(&self.options.kafka_topic);
        let mut report = ScenarioReport::new(scenario.name(), &topic);
        let start = Instant::now();

        info!("Running scenario '{scenario}' on topic '{topic}'");
        let outcome = match scenario {
            Scenario::Streaming => scenarios::streaming::run(self, &topic, &mut report).await,
            Scenario::Batch => scenarios::batch::run(self, &topic, &mut report).await,
            Scenario::NullRoundTrip => {
                scenarios::null_roundtrip::run(self, &topic, &mut report).await
            }
            Scenario::DynamicPartitions => {
                scenarios::dynamic_partitions::run(self, &topic, &mut report).await
            }
        };

        if let Err(e) = outcome {
            error!("Scenario '{scenario}' failed: {e:#}");
            report.add_error(format!("{e:#}"));
        }
        report.finish(start.elapsed());
        info!(
            "Scenario '{scenario}' finished with status {} in {:?}",
            report.status, report.duration
        );
        report
    }

    /// Run scenarios one after another.
    pub async fn run_all(&self, scenarios: &[Scenario]) -> Vec<ScenarioReport> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            reports.push(self.run(*scenario).await);
        }
        reports
    }
}
