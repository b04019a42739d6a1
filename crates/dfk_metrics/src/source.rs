//! Stats source trait.

use async_trait::async_trait;

use crate::error::MetricsResult;
use crate::record::{ContainerInfo, StatsSample};

/// Where container stats come from.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Human-readable daemon version.
    async fn version(&self) -> MetricsResult<String>;

    /// Containers currently running.
    async fn list_running(&self) -> MetricsResult<Vec<ContainerInfo>>;

    /// One stats reading for a container.
    ///
    /// Returns [`MetricsError::ContainerGone`](crate::MetricsError::ContainerGone)
    /// when the container stopped after being listed.
    async fn sample(&self, container_id: &str) -> MetricsResult<StatsSample>;
}
