//! Harness options, read once at startup.

use crate::error::HarnessError;
use crate::stages::WriteSchedule;
use clap::Args;
use io_metrics::InfluxDbSettings;
use std::time::Duration;
use synthetic_source::SyntheticSourceOptions;

/// Options shared by every scenario.
#[derive(Args, Clone, Debug)]
pub struct HarnessOptions {
    /// Synthetic source options as JSON, e.g. '{"numRecords":1000,"keySizeBytes":10,"valueSizeBytes":90}'
    #[arg(long, env = "SOURCE_OPTIONS", value_parser = parse_source_options)]
    pub source_options: SyntheticSourceOptions,

    /// Kafka bootstrap servers (comma-separated)
    #[arg(
        long,
        env = "KAFKA_BOOTSTRAP_SERVER_ADDRESSES",
        default_value = "localhost:9092"
    )]
    pub kafka_bootstrap_server_addresses: String,

    /// Base topic name; scenarios derive their own topics from it
    #[arg(long, env = "KAFKA_TOPIC")]
    pub kafka_topic: String,

    /// Read timeout in seconds
    #[arg(long, env = "READ_TIMEOUT")]
    pub read_timeout: u64,

    /// Send records one at a time with this many milliseconds between them
    #[arg(long, env = "PUBLISH_INTERVAL_MS")]
    pub publish_interval_ms: Option<u64>,

    /// Records per producer batch; ignored when a publish interval is set
    #[arg(long, env = "WRITE_BATCH_SIZE", default_value_t = kafka_io::DEFAULT_BATCH_SIZE)]
    pub write_batch_size: usize,

    /// Start Kafka in a container instead of using the bootstrap servers
    #[arg(long, env = "WITH_TESTCONTAINERS")]
    pub with_testcontainers: bool,

    /// Image tag of the Kafka container
    #[arg(long, env = "KAFKA_CONTAINER_VERSION", default_value = "6.1.1")]
    pub kafka_container_version: String,

    /// InfluxDB URL; results are published only when set
    #[arg(long, env = "INFLUX_HOST")]
    pub influx_host: Option<String>,

    #[arg(long, env = "INFLUX_DATABASE")]
    pub influx_database: Option<String>,

    #[arg(long, env = "INFLUX_MEASUREMENT")]
    pub influx_measurement: Option<String>,

    /// InfluxDB user for basic authentication
    #[arg(long, env = "INFLUX_USERNAME", requires = "influx_password")]
    pub influx_username: Option<String>,

    #[arg(long, env = "INFLUX_PASSWORD", hide_env_values = true)]
    pub influx_password: Option<String>,
}

fn parse_source_options(value: &str) -> Result<SyntheticSourceOptions, String> {
    SyntheticSourceOptions::from_json_str(value).map_err(|e| e.to_string())
}

impl HarnessOptions {
    /// Options for a run against `bootstrap_servers` without publishing.
    pub fn new(
        source_options: SyntheticSourceOptions,
        bootstrap_servers: impl Into<String>,
        topic: impl Into<String>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            source_options,
            kafka_bootstrap_server_addresses: bootstrap_servers.into(),
            kafka_topic: topic.into(),
            read_timeout: read_timeout.as_secs(),
            publish_interval_ms: None,
            write_batch_size: kafka_io::DEFAULT_BATCH_SIZE,
            with_testcontainers: false,
            kafka_container_version: "6.1.1".to_string(),
            influx_host: None,
            influx_database: None,
            influx_measurement: None,
            influx_username: None,
            influx_password: None,
        }
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout)
    }

    /// Pacing of the dataset writes. A publish interval wins over batching.
    pub fn write_schedule(&self) -> WriteSchedule {
        match self.publish_interval_ms {
            Some(ms) => WriteSchedule::Fixed {
                interval: Duration::from_millis(ms),
            },
            None => WriteSchedule::Batched {
                batch_size: self.write_batch_size,
            },
        }
    }

    /// Publishing settings, or `None` when no InfluxDB host is configured.
    pub fn influx_settings(&self) -> Result<Option<InfluxDbSettings>, HarnessError> {
        let Some(host) = &self.influx_host else {
            return Ok(None);
        };

        let mut builder = InfluxDbSettings::builder().with_host(host);
        if let Some(database) = &self.influx_database {
            builder = builder.with_database(database);
        }
        if let Some(measurement) = &self.influx_measurement {
            builder = builder.with_measurement(measurement);
        }
        if let (Some(username), Some(password)) = (&self.influx_username, &self.influx_password) {
            builder = builder.with_credentials(username, password);
        }
        Ok(Some(builder.build()?))
    }

    pub fn validate(&self) -> Result<(), HarnessError> {
        self.source_options.validate()?;
        if self.kafka_topic.trim().is_empty() {
            return Err(HarnessError::InvalidOptions(
                "kafka topic must not be empty".to_string(),
            ));
        }
        if self.write_batch_size == 0 {
            return Err(HarnessError::InvalidOptions(
                "write batch size must be at least one".to_string(),
            ));
        }
        if self.read_timeout == 0 {
            return Err(HarnessError::InvalidOptions(
                "read timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        options: HarnessOptions,
    }

    #[test]
    fn test_parse_flags() {
        let cli = TestCli::try_parse_from([
            "kafka-io-it",
            "--source-options",
            r#"{"numRecords":1000,"keySizeBytes":10,"valueSizeBytes":90}"#,
            "--kafka-topic",
            "beam",
            "--read-timeout",
            "900",
        ])
        .unwrap();

        let options = cli.options;
        assert_eq!(options.source_options.num_records, 1000);
        assert_eq!(options.source_options.key_size_bytes, 10);
        assert_eq!(options.kafka_bootstrap_server_addresses, "localhost:9092");
        assert_eq!(options.read_timeout(), Duration::from_secs(900));
        assert!(!options.with_testcontainers);
        assert_eq!(options.influx_settings().unwrap(), None);
        assert_eq!(options.write_schedule(), WriteSchedule::default());
        options.validate().unwrap();
    }

    #[test]
    fn test_write_schedule_flags() {
        let cli = TestCli::try_parse_from([
            "kafka-io-it",
            "--source-options",
            r#"{"numRecords":10}"#,
            "--kafka-topic",
            "beam",
            "--read-timeout",
            "10",
            "--write-batch-size",
            "50",
        ])
        .unwrap();
        assert_eq!(
            cli.options.write_schedule(),
            WriteSchedule::Batched { batch_size: 50 }
        );

        let mut options = cli.options;
        options.publish_interval_ms = Some(250);
        assert_eq!(
            options.write_schedule(),
            WriteSchedule::Fixed {
                interval: Duration::from_millis(250)
            }
        );

        options.publish_interval_ms = None;
        options.write_batch_size = 0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_influx_credentials_flags() {
        let cli = TestCli::try_parse_from([
            "kafka-io-it",
            "--source-options",
            r#"{"numRecords":10}"#,
            "--kafka-topic",
            "beam",
            "--read-timeout",
            "10",
            "--influx-host",
            "http://influx:8086",
            "--influx-database",
            "beam_test_metrics",
            "--influx-measurement",
            "kafkaioit_results",
            "--influx-username",
            "writer",
            "--influx-password",
            "secret",
        ])
        .unwrap();

        let settings = cli.options.influx_settings().unwrap().unwrap();
        assert_eq!(settings.username.as_deref(), Some("writer"));
        assert_eq!(settings.password.as_deref(), Some("secret"));

        let missing_password = TestCli::try_parse_from([
            "kafka-io-it",
            "--source-options",
            r#"{"numRecords":10}"#,
            "--kafka-topic",
            "beam",
            "--read-timeout",
            "10",
            "--influx-username",
            "writer",
        ]);
        assert!(missing_password.is_err());
    }

    #[test]
    fn test_rejects_bad_source_options() {
        let result = TestCli::try_parse_from([
            "kafka-io-it",
            "--source-options",
            r#"{"keySizeBytes":10}"#,
            "--kafka-topic",
            "beam",
            "--read-timeout",
            "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_influx_settings() {
        let mut options = HarnessOptions::new(
            SyntheticSourceOptions::new(10),
            "localhost:9092",
            "beam",
            Duration::from_secs(10),
        );
        options.influx_host = Some("http://influx:8086".to_string());
        assert!(options.influx_settings().is_err());

        options.influx_database = Some("beam_test_metrics".to_string());
        options.influx_measurement = Some("kafkaioit_results".to_string());
        let settings = options.influx_settings().unwrap().unwrap();
        assert_eq!(settings.database, "beam_test_metrics");
    }

    #[test]
    fn test_validate() {
        let mut options = HarnessOptions::new(
            SyntheticSourceOptions::new(10),
            "localhost:9092",
            " ",
            Duration::from_secs(10),
        );
        assert!(options.validate().is_err());

        options.kafka_topic = "beam".to_string();
        options.read_timeout = 0;
        assert!(options.validate().is_err());
    }
}
