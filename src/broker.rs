//! The Kafka cluster a run talks to.

use crate::error::HarnessError;
use crate::options::HarnessOptions;
use kafka_io::{ConsumerConfig, ProducerConfig, TopicAdmin};
use tracing::info;

#[cfg(feature = "testcontainers")]
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
#[cfg(feature = "testcontainers")]
use testcontainers_modules::kafka::{Kafka, KAFKA_PORT};

/// Bootstrap address of the cluster, plus the container backing it when the
/// harness started one. Dropping the environment stops the container.
pub struct BrokerEnvironment {
    bootstrap_servers: String,
    #[cfg(feature = "testcontainers")]
    container: Option<ContainerAsync<Kafka>>,
}

impl BrokerEnvironment {
    /// Use an already running cluster.
    pub fn external(bootstrap_servers: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            #[cfg(feature = "testcontainers")]
            container: None,
        }
    }

    pub async fn start(options: &HarnessOptions) -> Result<Self, HarnessError> {
        if options.with_testcontainers {
            return Self::start_container(&options.kafka_container_version).await;
        }
        info!(
            "Using Kafka at {}",
            options.kafka_bootstrap_server_addresses
        );
        Ok(Self::external(&options.kafka_bootstrap_server_addresses))
    }

    #[cfg(feature = "testcontainers")]
    async fn start_container(version: &str) -> Result<Self, HarnessError> {
        info!("Starting Kafka container (tag {version})");
        let container = Kafka::default()
            .with_tag(version)
            .start()
            .await
            .map_err(|e| HarnessError::Broker(format!("failed to start Kafka container: {e}")))?;
        let port = container
            .get_host_port_ipv4(KAFKA_PORT)
            .await
            .map_err(|e| HarnessError::Broker(format!("failed to resolve Kafka port: {e}")))?;

        let bootstrap_servers = format!("127.0.0.1:{port}");
        info!("Kafka container ready at {bootstrap_servers}");
        Ok(Self {
            bootstrap_servers,
            container: Some(container),
        })
    }

    #[cfg(not(feature = "testcontainers"))]
    async fn start_container(_version: &str) -> Result<Self, HarnessError> {
        Err(HarnessError::Broker(
            "container support is not compiled in; rebuild with --features testcontainers"
                .to_string(),
        ))
    }

    pub fn bootstrap_servers(&self) -> &str {
        &self.bootstrap_servers
    }

    pub fn uses_container(&self) -> bool {
        #[cfg(feature = "testcontainers")]
        {
            self.container.is_some()
        }
        #[cfg(not(feature = "testcontainers"))]
        {
            false
        }
    }

    pub fn producer_config(&self) -> ProducerConfig {
        ProducerConfig::new(&self.bootstrap_servers)
    }

    /// Consumer settings for a reader identified by `group_id`.
    pub fn consumer_config(&self, group_id: &str) -> ConsumerConfig {
        ConsumerConfig::new(&self.bootstrap_servers, group_id)
    }

    pub fn admin(&self) -> Result<TopicAdmin, HarnessError> {
        Ok(TopicAdmin::new(&self.bootstrap_servers)?)
    }
}
