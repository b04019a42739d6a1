//! Metrics collection across all running containers.

use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::error::{MetricsError, MetricsResult};
use crate::record::ContainerMetrics;
use crate::source::StatsSource;

/// Samples every running container of a [`StatsSource`].
pub struct MetricsCollector<S: StatsSource> {
    source: S,
    timeout_seconds: u64,
}

impl<S: StatsSource> MetricsCollector<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            timeout_seconds: 0,
        }
    }

    /// Bound the whole collection (0 = no timeout).
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// One record per running container, ordered by container name.
    ///
    /// Containers that stop between listing and sampling are skipped.
    pub async fn collect(&self) -> MetricsResult<Vec<ContainerMetrics>> {
        if self.timeout_seconds == 0 {
            return self.collect_all().await;
        }

        match timeout(Duration::from_secs(self.timeout_seconds), self.collect_all()).await {
            Ok(result) => result,
            Err(_) => Err(MetricsError::Timeout(self.timeout_seconds)),
        }
    }

    async fn collect_all(&self) -> MetricsResult<Vec<ContainerMetrics>> {
        let containers = self.source.list_running().await?;
        debug!("Sampling {} containers", containers.len());

        let samples = join_all(
            containers
                .iter()
                .map(|container| self.source.sample(&container.id)),
        )
        .await;

        let collected_at = Utc::now();
        let mut records = Vec::with_capacity(containers.len());

        for (container, sample) in containers.into_iter().zip(samples) {
            match sample {
                Ok(sample) => {
                    records.push(ContainerMetrics::from_sample(container, &sample, collected_at))
                }
                Err(MetricsError::ContainerGone(id)) => {
                    warn!("Container {} stopped before it could be sampled", id);
                }
                Err(e) => return Err(e),
            }
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        info!("Collected metrics for {} containers", records.len());
        Ok(records)
    }
}
