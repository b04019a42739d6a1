//! Docker implementation of StatsSource.

use std::collections::HashMap;

use async_trait::async_trait;
use bollard::container::{ListContainersOptions, Stats, StatsOptions};
use bollard::Docker;
use futures_util::StreamExt;
use tracing::debug;

use crate::config::MetricsConfig;
use crate::error::{MetricsError, MetricsResult};
use crate::record::{ContainerInfo, StatsSample};
use crate::source::StatsSource;

/// Stats source backed by the Docker Engine API.
pub struct DockerStatsSource {
    client: Docker,
}

impl DockerStatsSource {
    /// Connect using the configured host, or local defaults.
    pub async fn connect(config: &MetricsConfig) -> MetricsResult<Self> {
        let timeout = config.client_timeout_seconds;
        let client = match config.docker_host.as_deref() {
            Some(host) if host.starts_with("unix://") => Docker::connect_with_socket(
                host.trim_start_matches("unix://"),
                timeout,
                bollard::API_DEFAULT_VERSION,
            )?,
            Some(host) => Docker::connect_with_http(host, timeout, bollard::API_DEFAULT_VERSION)?,
            None => Docker::connect_with_local_defaults()?,
        };

        // Verify connection
        client
            .ping()
            .await
            .map_err(|e| MetricsError::DockerUnavailable(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl StatsSource for DockerStatsSource {
    async fn version(&self) -> MetricsResult<String> {
        let version = self.client.version().await?;
        Ok(format!(
            "Docker {} (API {})",
            version.version.unwrap_or_default(),
            version.api_version.unwrap_or_default()
        ))
    }

    async fn list_running(&self) -> MetricsResult<Vec<ContainerInfo>> {
        let mut filters = HashMap::new();
        filters.insert("status".to_string(), vec!["running".to_string()]);

        let options = ListContainersOptions {
            all: false,
            filters,
            ..Default::default()
        };

        let containers = self.client.list_containers(Some(options)).await?;
        debug!("Docker reports {} running containers", containers.len());

        Ok(containers
            .into_iter()
            .filter_map(|summary| {
                let id = summary.id?;
                let name = summary
                    .names
                    .and_then(|names| names.into_iter().next())
                    .map(|n| n.trim_start_matches('/').to_string())
                    .unwrap_or_else(|| id.chars().take(12).collect());
                Some(ContainerInfo {
                    id,
                    name,
                    image: summary.image.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn sample(&self, container_id: &str) -> MetricsResult<StatsSample> {
        // A non-streaming read waits for a second reading so precpu is populated.
        let options = StatsOptions {
            stream: false,
            one_shot: false,
        };

        let mut stream = self.client.stats(container_id, Some(options));
        match stream.next().await {
            Some(Ok(stats)) => Ok(sample_from_stats(&stats)),
            Some(Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            })) => Err(MetricsError::ContainerGone(container_id.to_string())),
            Some(Err(e)) => Err(e.into()),
            None => Err(MetricsError::NoStats(container_id.to_string())),
        }
    }
}

fn sample_from_stats(stats: &Stats) -> StatsSample {
    let online_cpus = stats
        .cpu_stats
        .online_cpus
        .or_else(|| {
            stats
                .cpu_stats
                .cpu_usage
                .percpu_usage
                .as_ref()
                .map(|per_cpu| per_cpu.len() as u64)
        })
        .unwrap_or(1);

    StatsSample {
        cpu_total: stats.cpu_stats.cpu_usage.total_usage,
        precpu_total: stats.precpu_stats.cpu_usage.total_usage,
        system_cpu: stats.cpu_stats.system_cpu_usage.unwrap_or(0),
        presystem_cpu: stats.precpu_stats.system_cpu_usage.unwrap_or(0),
        online_cpus,
        memory_usage: stats.memory_stats.usage.unwrap_or(0),
        memory_limit: stats.memory_stats.limit.unwrap_or(0),
    }
}
