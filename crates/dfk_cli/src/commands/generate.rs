//! Generate command - Render a Dockerfile from the catalog.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use dfk_templates::{DockerfileGenerator, RenderedDockerfile};

use super::{CatalogArgs, SpecArgs};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    spec: SpecArgs,

    #[command(flatten)]
    catalog: CatalogArgs,

    /// Directory to write the Dockerfile into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Overwrite an existing Dockerfile
    #[arg(long)]
    force: bool,

    /// Print the Dockerfile instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Image repository name; prints the matching `docker build` command
    #[arg(long)]
    image_name: Option<String>,
}

pub async fn execute(args: GenerateArgs) -> Result<()> {
    let catalog = args.catalog.load()?;
    let spec = args.spec.to_spec();

    let rendered = DockerfileGenerator::new().render(&spec, &catalog)?;

    if args.dry_run {
        print!("{}", rendered.text);
        println!();
        println!("# tags: {}", rendered.tags.join(", "));
        return Ok(());
    }

    let output_path = args.output_dir.join("Dockerfile");
    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Dockerfile already exists at {:?} (use --force to overwrite)",
            output_path
        );
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", args.output_dir))?;
    fs::write(&output_path, &rendered.text)
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    info!("Wrote {:?}", output_path);
    println!("✅ Dockerfile generated at {}", output_path.display());
    println!("🏷️  Tags: {}", rendered.tags.join(", "));

    if let Some(image_name) = &args.image_name {
        println!();
        println!("{}", build_command(&rendered, image_name, &args.output_dir));
    }

    Ok(())
}

/// `docker build` invocation with one `-t` flag per tag.
fn build_command(rendered: &RenderedDockerfile, image_name: &str, context: &Path) -> String {
    let mut parts = vec!["docker".to_string(), "build".to_string()];
    parts.extend(rendered.docker_tag_args(image_name));
    parts.push(context.display().to_string());
    parts.join(" ")
}
