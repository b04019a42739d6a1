//! CLI command definitions.
//!
//! Each subcommand maps to one of the repository's automation tools.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use dfk_templates::{ImageSpec, TemplateCatalog};

pub mod generate;
pub mod list;
pub mod metrics;
pub mod scan_tags;
pub mod tags;

/// dfk - Dockerfile generation, image tagging and container metrics
#[derive(Parser)]
#[command(name = "dfk")]
#[command(version, about = "dfk - Dockerfile generation, image tagging and container metrics")]
#[command(long_about = r#"
dfk renders Dockerfiles from a catalog of base-image templates, derives the
tags a built image should carry, and reports resource usage of running
containers.

COMMANDS:
  generate   → Render a Dockerfile for a base image / version / variant
  tags       → Print the tags for an image configuration
  list       → List catalog entries
  scan-tags  → Derive tags for existing Dockerfiles in a tree
  metrics    → Collect CPU and memory usage of running containers

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments or image spec
  3 - Unknown base image
  4 - Template or catalog error
  5 - Docker error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a Dockerfile from the template catalog
    Generate(generate::GenerateArgs),

    /// Print the tags for an image configuration
    Tags(tags::TagsArgs),

    /// List the template catalog
    List(list::ListArgs),

    /// Derive tags for existing Dockerfiles
    #[command(name = "scan-tags")]
    ScanTags(scan_tags::ScanTagsArgs),

    /// Collect resource usage of running containers
    Metrics(metrics::MetricsArgs),
}

/// Output format for listings and reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Location of the template catalog.
#[derive(Args)]
pub struct CatalogArgs {
    /// Templates directory
    #[arg(long, env = "DFK_TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,
}

impl CatalogArgs {
    pub fn load(&self) -> Result<TemplateCatalog> {
        TemplateCatalog::load(&self.templates_dir)
            .with_context(|| format!("Failed to load template catalog from {:?}", self.templates_dir))
    }
}

/// Image configuration flags.
#[derive(Args)]
pub struct SpecArgs {
    /// Base image from the catalog (e.g., debian, python)
    #[arg(short, long)]
    pub base_image: String,

    /// Language or OS version (e.g., 3.12, 12)
    #[arg(short = 'l', long, alias = "python-version")]
    pub language_version: Option<String>,

    /// Extra package to install (repeatable)
    #[arg(short, long = "package")]
    pub packages: Vec<String>,

    /// Template variant (e.g., slim)
    #[arg(long)]
    pub variant: Option<String>,

    /// Environment variable for the image (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env_vars: Vec<String>,

    /// Mark this configuration as the primary one for its base image (adds `latest`)
    #[arg(long)]
    pub primary: bool,
}

impl SpecArgs {
    pub fn to_spec(&self) -> ImageSpec {
        ImageSpec {
            base_image: self.base_image.clone(),
            language_version: self.language_version.clone(),
            extra_packages: self.packages.clone(),
            variant: self.variant.clone(),
            env_vars: self.env_vars.clone(),
            primary: self.primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_spec_flags() {
        let cli = Cli::parse_from([
            "dfk",
            "tags",
            "--base-image",
            "debian",
            "--python-version",
            "12",
            "--package",
            "git",
            "-p",
            "curl",
            "--variant",
            "slim",
            "--env",
            "TZ=UTC",
            "--env",
            "LANG=C.UTF-8",
            "--primary",
        ]);

        let Commands::Tags(args) = cli.command else {
            panic!("expected tags command");
        };
        let spec = args.spec.to_spec();
        assert_eq!(spec.base_image, "debian");
        assert_eq!(spec.language_version.as_deref(), Some("12"));
        assert_eq!(spec.extra_packages, vec!["git", "curl"]);
        assert_eq!(spec.variant.as_deref(), Some("slim"));
        assert_eq!(spec.env_vars, vec!["TZ=UTC", "LANG=C.UTF-8"]);
        assert!(spec.primary);
    }
}
