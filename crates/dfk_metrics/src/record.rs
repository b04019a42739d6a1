//! Metric records and raw stats samples.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A running container as listed by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub id: String,
    /// Name without the leading `/`
    pub name: String,
    pub image: String,
}

impl ContainerInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
        }
    }
}

/// One stats reading: current and previous CPU counters plus memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSample {
    pub cpu_total: u64,
    pub precpu_total: u64,
    pub system_cpu: u64,
    pub presystem_cpu: u64,
    pub online_cpus: u64,
    pub memory_usage: u64,
    pub memory_limit: u64,
}

impl StatsSample {
    /// CPU usage as `docker stats` reports it: share of one CPU times online CPUs.
    ///
    /// Zero when either counter did not advance.
    pub fn cpu_percent(&self) -> f64 {
        let cpu_delta = self.cpu_total.saturating_sub(self.precpu_total);
        let system_delta = self.system_cpu.saturating_sub(self.presystem_cpu);
        if cpu_delta == 0 || system_delta == 0 {
            return 0.0;
        }
        let cpus = self.online_cpus.max(1) as f64;
        (cpu_delta as f64 / system_delta as f64) * cpus * 100.0
    }
}

/// Resource usage of one container at collection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    pub container_id: String,
    pub name: String,
    pub image: String,
    pub cpu_percent: f64,
    pub memory_usage_bytes: u64,
    pub memory_limit_bytes: u64,
    pub collected_at: DateTime<Utc>,
}

impl ContainerMetrics {
    pub fn from_sample(info: ContainerInfo, sample: &StatsSample, collected_at: DateTime<Utc>) -> Self {
        Self {
            container_id: info.id,
            name: info.name,
            image: info.image,
            cpu_percent: sample.cpu_percent(),
            memory_usage_bytes: sample.memory_usage,
            memory_limit_bytes: sample.memory_limit,
            collected_at,
        }
    }

    /// Memory usage relative to the limit; zero when no limit is reported.
    pub fn memory_percent(&self) -> f64 {
        if self.memory_limit_bytes == 0 {
            return 0.0;
        }
        self.memory_usage_bytes as f64 / self.memory_limit_bytes as f64 * 100.0
    }

    /// First 12 characters of the container id.
    pub fn short_id(&self) -> &str {
        match self.container_id.char_indices().nth(12) {
            Some((end, _)) => &self.container_id[..end],
            None => &self.container_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_percent() {
        let sample = StatsSample {
            cpu_total: 400,
            precpu_total: 200,
            system_cpu: 2_000,
            presystem_cpu: 1_000,
            online_cpus: 4,
            ..Default::default()
        };
        assert!((sample.cpu_percent() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpu_percent_without_progress() {
        let sample = StatsSample {
            cpu_total: 100,
            precpu_total: 100,
            system_cpu: 2_000,
            presystem_cpu: 1_000,
            online_cpus: 2,
            ..Default::default()
        };
        assert_eq!(sample.cpu_percent(), 0.0);

        // First reading: no previous counters from the daemon
        let first = StatsSample {
            cpu_total: 100,
            system_cpu: 0,
            ..Default::default()
        };
        assert_eq!(first.cpu_percent(), 0.0);
    }

    #[test]
    fn test_memory_percent_and_short_id() {
        let metrics = ContainerMetrics::from_sample(
            ContainerInfo::new("0123456789abcdef", "web", "nginx:1.27"),
            &StatsSample {
                memory_usage: 256,
                memory_limit: 1024,
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(metrics.memory_percent(), 25.0);
        assert_eq!(metrics.short_id(), "0123456789ab");
    }

    #[test]
    fn test_short_id_respects_char_boundaries() {
        let sample = StatsSample::default();
        let metrics = ContainerMetrics::from_sample(
            ContainerInfo::new("éééééééééééééé", "x", "y"),
            &sample,
            Utc::now(),
        );
        assert_eq!(metrics.short_id(), "éééééééééééé");

        let short =
            ContainerMetrics::from_sample(ContainerInfo::new("ab", "x", "y"), &sample, Utc::now());
        assert_eq!(short.short_id(), "ab");
    }
}
