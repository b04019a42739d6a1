//! Error types for metrics collection.

use thiserror::Error;

/// Result type alias for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors that can occur while collecting container metrics.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Docker not available: {0}")]
    DockerUnavailable(String),

    #[error("Container {0} is no longer running")]
    ContainerGone(String),

    #[error("No stats returned for container {0}")]
    NoStats(String),

    #[error("Metrics collection timed out after {0} seconds")]
    Timeout(u64),

    #[error("Docker API error: {0}")]
    DockerApi(#[from] bollard::errors::Error),
}
