//! `apicompat explain` command
//!
//! Runs the full pass, then reports on a single release class.

use anyhow::{Context, Result};

use crate::cli::ExplainArgs;
use apicompat::ops::analyze;
use apicompat::DexType;

pub fn execute(args: ExplainArgs) -> Result<()> {
    let release = DexType::class(&args.release)
        .with_context(|| format!("invalid class descriptor `{}`", args.release))?;

    let options = super::analyze_options(args.input)?;
    let report = analyze(&options)?;

    println!("{}", report.explain(release.as_str()));
    Ok(())
}
