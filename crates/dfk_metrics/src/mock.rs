//! Mock stats source for testing.
//!
//! Provides a configurable implementation of the StatsSource trait for use in
//! tests without a Docker daemon.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{MetricsError, MetricsResult};
use crate::record::{ContainerInfo, StatsSample};
use crate::source::StatsSource;

#[derive(Debug, Clone)]
struct MockContainer {
    info: ContainerInfo,
    /// `None` once the container has stopped
    sample: Option<StatsSample>,
}

/// Mock stats source for testing.
///
/// Serves predefined containers and samples, and records which container ids
/// were sampled.
#[derive(Clone)]
pub struct MockStatsSource {
    containers: Arc<RwLock<Vec<MockContainer>>>,
    sampled: Arc<RwLock<Vec<String>>>,
    version: Arc<RwLock<String>>,
    simulate_failure: Arc<RwLock<Option<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockStatsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStatsSource {
    pub fn new() -> Self {
        Self {
            containers: Arc::new(RwLock::new(Vec::new())),
            sampled: Arc::new(RwLock::new(Vec::new())),
            version: Arc::new(RwLock::new("mock-docker 1.0.0".to_string())),
            simulate_failure: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a running container with its stats.
    pub fn add_container(self, info: ContainerInfo, sample: StatsSample) -> Self {
        self.containers.write().push(MockContainer {
            info,
            sample: Some(sample),
        });
        self
    }

    /// Add a container that is listed but stops before it is sampled.
    pub fn add_vanished(self, info: ContainerInfo) -> Self {
        self.containers.write().push(MockContainer { info, sample: None });
        self
    }

    pub fn set_version(self, version: impl Into<String>) -> Self {
        *self.version.write() = version.into();
        self
    }

    /// Fail every call as if the daemon were unreachable.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    /// Delay every sample call.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.write() = Some(delay);
        self
    }

    /// Container ids passed to `sample`, in call order.
    pub fn sampled_ids(&self) -> Vec<String> {
        self.sampled.read().clone()
    }

    fn check_failure(&self) -> MetricsResult<()> {
        if let Some(msg) = self.simulate_failure.read().clone() {
            return Err(MetricsError::DockerUnavailable(msg));
        }
        Ok(())
    }
}

#[async_trait]
impl StatsSource for MockStatsSource {
    async fn version(&self) -> MetricsResult<String> {
        self.check_failure()?;
        Ok(self.version.read().clone())
    }

    async fn list_running(&self) -> MetricsResult<Vec<ContainerInfo>> {
        self.check_failure()?;
        Ok(self
            .containers
            .read()
            .iter()
            .map(|c| c.info.clone())
            .collect())
    }

    async fn sample(&self, container_id: &str) -> MetricsResult<StatsSample> {
        self.check_failure()?;
        self.sampled.write().push(container_id.to_string());

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let sample = self
            .containers
            .read()
            .iter()
            .find(|c| c.info.id == container_id)
            .map(|c| c.sample.clone());

        match sample {
            Some(Some(sample)) => Ok(sample),
            _ => Err(MetricsError::ContainerGone(container_id.to_string())),
        }
    }
}
