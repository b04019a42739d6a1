//! Tags command - Print the tags for an image configuration.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::Args;

use dfk_templates::DockerfileGenerator;

use super::{CatalogArgs, SpecArgs};

#[derive(Args)]
pub struct TagsArgs {
    #[command(flatten)]
    pub(crate) spec: SpecArgs,

    #[command(flatten)]
    catalog: CatalogArgs,

    /// Add a dated build tag for today (UTC)
    #[arg(long)]
    dated: bool,

    /// Add a dated build tag for this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Print `-t <image>:<tag>` arguments for this repository instead of bare tags
    #[arg(long)]
    image_name: Option<String>,

    /// Print tags as a JSON array
    #[arg(long, conflicts_with = "image_name")]
    json: bool,
}

pub async fn execute(args: TagsArgs) -> Result<()> {
    let catalog = args.catalog.load()?;
    let spec = args.spec.to_spec();

    let build_date = args
        .date
        .or_else(|| args.dated.then(|| Utc::now().date_naive()));

    let tags = DockerfileGenerator::new().derive_tags(&spec, &catalog, build_date)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else if let Some(image_name) = &args.image_name {
        let flags: Vec<String> = tags
            .iter()
            .map(|tag| format!("-t {}:{}", image_name, tag))
            .collect();
        println!("{}", flags.join(" "));
    } else {
        for tag in &tags {
            println!("{}", tag);
        }
    }

    Ok(())
}
