//! dfk CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments or image spec
//! - 3: Unknown base image
//! - 4: Template or catalog error
//! - 5: Docker error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dfk_metrics::MetricsError;
use dfk_templates::DockerfileError;

mod commands;

use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const UNKNOWN_BASE_IMAGE: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
    pub const DOCKER_ERROR: u8 = 5;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "dfk=debug,info" } else { "dfk=info,warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Ignore the error when a subscriber is already installed
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args).await,
        Commands::Tags(args) => commands::tags::execute(args).await,
        Commands::List(args) => commands::list::execute(args).await,
        Commands::ScanTags(args) => commands::scan_tags::execute(args).await,
        Commands::Metrics(args) => commands::metrics::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Map an error chain to its exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(err) = cause.downcast_ref::<DockerfileError>() {
            return match err {
                DockerfileError::InvalidImageSpec { .. } => ExitCodes::INVALID_ARGS,
                DockerfileError::UnknownBaseImage { .. } => ExitCodes::UNKNOWN_BASE_IMAGE,
                DockerfileError::CatalogLoad { .. } | DockerfileError::TemplateRender { .. } => {
                    ExitCodes::TEMPLATE_ERROR
                }
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<MetricsError>().is_some() {
            return ExitCodes::DOCKER_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use dfk_templates::SpecField;

    #[test]
    fn test_categorize_template_errors() {
        let unknown = anyhow::Error::new(DockerfileError::UnknownBaseImage {
            base_image: "fedora".to_string(),
            variant: None,
            supported: vec!["debian".to_string()],
        });
        assert_eq!(categorize_error(&unknown), ExitCodes::UNKNOWN_BASE_IMAGE);

        let invalid = anyhow::Error::new(DockerfileError::InvalidImageSpec {
            field: SpecField::LanguageVersion,
            message: "bad".to_string(),
        });
        assert_eq!(categorize_error(&invalid), ExitCodes::INVALID_ARGS);
    }

    #[test]
    fn test_categorize_looks_through_context() {
        let err: anyhow::Result<()> = Err(DockerfileError::CatalogLoad {
            path: "templates".into(),
            message: "missing".to_string(),
        })
        .context("Failed to load template catalog");
        assert_eq!(categorize_error(&err.unwrap_err()), ExitCodes::TEMPLATE_ERROR);
    }

    #[test]
    fn test_categorize_docker_and_general() {
        let docker = anyhow::Error::new(MetricsError::Timeout(5));
        assert_eq!(categorize_error(&docker), ExitCodes::DOCKER_ERROR);

        let other = anyhow::anyhow!("Dockerfile already exists");
        assert_eq!(categorize_error(&other), ExitCodes::GENERAL_ERROR);
    }
}
