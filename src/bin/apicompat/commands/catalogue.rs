//! `apicompat catalogue` command

use anyhow::{Context, Result};

use crate::cli::CatalogueArgs;
use apicompat::ops::summarize_catalogue;

pub fn execute(args: CatalogueArgs) -> Result<()> {
    let summary = summarize_catalogue(&args.file)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("failed to render summary")?;
        println!("{}", json);
    } else {
        println!("{}", args.file.display());
        print!("{}", summary);
    }

    Ok(())
}
