//! # dfk_metrics
//!
//! Resource usage of running containers, read from the local Docker daemon.
//!
//! Each collection yields one [`ContainerMetrics`] record per running
//! container with its CPU percentage and memory usage/limit.
//!
//! # Example
//!
//! ```rust,no_run
//! use dfk_metrics::{DockerStatsSource, MetricsCollector, MetricsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MetricsConfig::default();
//!     let source = DockerStatsSource::connect(&config).await?;
//!
//!     for record in MetricsCollector::new(source).collect().await? {
//!         println!("{} {:.1}%", record.name, record.cpu_percent);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod docker;
pub mod error;
pub mod mock;
pub mod record;
pub mod source;

pub use collector::MetricsCollector;
pub use config::MetricsConfig;
pub use docker::DockerStatsSource;
pub use error::{MetricsError, MetricsResult};
pub use mock::MockStatsSource;
pub use record::{ContainerInfo, ContainerMetrics, StatsSample};
pub use source::StatsSource;
