//! List command - Show the template catalog.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use dfk_templates::{PackageManager, TemplateCatalog};

use super::{CatalogArgs, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct EntryRow<'a> {
    base_image: &'a str,
    variant: Option<&'a str>,
    tag_prefix: &'a str,
    default_version: Option<&'a str>,
    package_manager: Option<PackageManager>,
    description: Option<&'a str>,
}

fn rows(catalog: &TemplateCatalog) -> Vec<EntryRow<'_>> {
    catalog
        .entries()
        .map(|entry| EntryRow {
            base_image: &entry.base_image,
            variant: entry.variant.as_deref(),
            tag_prefix: &entry.default_tag_prefix,
            default_version: entry.default_language_version.as_deref(),
            package_manager: entry.package_manager,
            description: entry.description.as_deref(),
        })
        .collect()
}

pub async fn execute(args: ListArgs) -> Result<()> {
    let catalog = args.catalog.load()?;
    let rows = rows(&catalog);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&rows)?),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("⚠️  No templates found in {:?}", args.catalog.templates_dir);
                return Ok(());
            }

            println!(
                "{:<12} {:<10} {:<12} {:<10} Description",
                "Base image", "Variant", "Tag prefix", "Default"
            );
            println!("{}", "-".repeat(72));
            for row in &rows {
                println!(
                    "{:<12} {:<10} {:<12} {:<10} {}",
                    row.base_image,
                    row.variant.unwrap_or("-"),
                    row.tag_prefix,
                    row.default_version.unwrap_or("-"),
                    row.description.unwrap_or("")
                );
            }
            println!();
            println!("Found {} template entries", rows.len());
        }
    }

    Ok(())
}
