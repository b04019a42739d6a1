//! Scan-tags command - Derive tags for existing Dockerfiles.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dfk_templates::DockerfileScanner;

#[derive(Args)]
pub struct ScanTagsArgs {
    /// Repository root to scan
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn execute(args: ScanTagsArgs) -> Result<()> {
    let report = DockerfileScanner::new(&args.root)
        .scan()
        .with_context(|| format!("Failed to scan {:?}", args.root))?;
    let json = report.to_json()?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {:?}", path))?;
            info!("Wrote tag report to {:?}", path);
            println!(
                "✅ Tags for {} Dockerfiles written to {}",
                report.dockerfiles.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
