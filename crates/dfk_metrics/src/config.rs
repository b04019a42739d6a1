//! Collector configuration.

use serde::{Deserialize, Serialize};

/// How to reach the Docker daemon and how long to wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Daemon address (`unix:///path`, `tcp://host:port`); local defaults when unset
    pub docker_host: Option<String>,
    /// Per-request client timeout in seconds
    pub client_timeout_seconds: u64,
    /// Overall collection timeout in seconds (0 = no timeout)
    pub timeout_seconds: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            docker_host: None,
            client_timeout_seconds: 120,
            timeout_seconds: 60,
        }
    }
}

impl MetricsConfig {
    pub fn docker_host(mut self, host: impl Into<String>) -> Self {
        self.docker_host = Some(host.into());
        self
    }

    pub fn client_timeout(mut self, seconds: u64) -> Self {
        self.client_timeout_seconds = seconds;
        self
    }

    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}
