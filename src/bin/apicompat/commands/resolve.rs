//! `apicompat resolve` command

use anyhow::{Context, Result};

use crate::cli::ResolveArgs;
use apicompat::ops::{analyze, format_report, OutputFormat};

pub fn execute(args: ResolveArgs) -> Result<()> {
    let format: OutputFormat = args
        .format
        .parse()
        .with_context(|| format!("invalid output format: {}", args.format))?;

    let options = super::analyze_options(args.input)?;
    let report = analyze(&options)?;
    let output = format_report(&report, format).context("failed to render report")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, output)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!("report written to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
