//! Metrics command - Report CPU and memory usage of running containers.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dfk_metrics::{ContainerMetrics, DockerStatsSource, MetricsCollector, MetricsConfig};

use super::OutputFormat;

#[derive(Args)]
pub struct MetricsArgs {
    /// Docker daemon address (unix:///var/run/docker.sock, tcp://host:2375)
    #[arg(long, env = "DOCKER_HOST")]
    docker_host: Option<String>,

    /// Overall collection timeout in seconds (0 disables it)
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn execute(args: MetricsArgs) -> Result<()> {
    let mut config = MetricsConfig::default().timeout(args.timeout);
    if let Some(host) = &args.docker_host {
        config = config.docker_host(host.clone());
    }

    let source = DockerStatsSource::connect(&config).await?;
    let metrics = MetricsCollector::new(source)
        .timeout(config.timeout_seconds)
        .collect()
        .await?;

    let report = match args.format {
        OutputFormat::Table => render_table(&metrics),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&metrics)?),
        OutputFormat::Yaml => serde_yaml::to_string(&metrics)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &report).with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote metrics for {} containers to {:?}", metrics.len(), path);
            println!("✅ Metrics written to {}", path.display());
        }
        None => print!("{}", report),
    }

    Ok(())
}

fn render_table(metrics: &[ContainerMetrics]) -> String {
    if metrics.is_empty() {
        return "No running containers\n".to_string();
    }

    let mut out = format!(
        "{:<24} {:<12} {:>8} {:>21} {:>7}\n",
        "NAME", "ID", "CPU %", "MEM USAGE / LIMIT", "MEM %"
    );
    for m in metrics {
        let memory = format!(
            "{} / {}",
            human_bytes(m.memory_usage_bytes),
            human_bytes(m.memory_limit_bytes)
        );
        out.push_str(&format!(
            "{:<24} {:<12} {:>7.2}% {:>21} {:>6.2}%\n",
            m.name,
            m.short_id(),
            m.cpu_percent,
            memory,
            m.memory_percent()
        ));
    }
    out
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{}{}", bytes, UNITS[0])
    } else {
        format!("{:.1}{}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512B");
        assert_eq!(human_bytes(2048), "2.0KiB");
        assert_eq!(human_bytes(256 * 1024 * 1024), "256.0MiB");
    }

    #[test]
    fn test_render_table() {
        let metrics = vec![ContainerMetrics {
            container_id: "0123456789abcdef".to_string(),
            name: "web".to_string(),
            image: "nginx:latest".to_string(),
            cpu_percent: 12.5,
            memory_usage_bytes: 512 * 1024 * 1024,
            memory_limit_bytes: 1024 * 1024 * 1024,
            collected_at: Utc::now(),
        }];

        let table = render_table(&metrics);
        let row = table.lines().nth(1).unwrap();
        assert!(row.starts_with("web"));
        assert!(row.contains("0123456789ab"));
        assert!(!row.contains("0123456789abc"));
        assert!(row.contains("12.50%"));
        assert!(row.contains("512.0MiB / 1.0GiB"));
        assert!(row.contains("50.00%"));
    }

    #[test]
    fn test_render_empty_table() {
        assert_eq!(render_table(&[]), "No running containers\n");
    }
}
