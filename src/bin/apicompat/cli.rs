//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// apicompat - find release-library classes that can be retargeted to the framework
#[derive(Parser)]
#[command(name = "apicompat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the compatibility pass and print the mapping
    Resolve(ResolveArgs),

    /// Summarize a framework API descriptor
    Catalogue(CatalogueArgs),

    /// Explain what happened to one release class
    Explain(ExplainArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Inputs shared by every command that runs the pass.
#[derive(Args)]
pub struct InputArgs {
    /// Framework API descriptor (overrides `[catalogue] path`)
    #[arg(long, env = "APICOMPAT_CATALOGUE")]
    pub catalogue: Option<PathBuf>,

    /// Program scope (JSON)
    #[arg(long)]
    pub scope: PathBuf,

    /// Config file (defaults to ./apicompat.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Release class name prefix (repeatable, replaces configured prefixes)
    #[arg(long = "release-prefix", value_name = "PREFIX")]
    pub release_prefixes: Vec<String>,

    /// Release class to exclude after convergence (repeatable)
    #[arg(long = "exclude", value_name = "TYPE")]
    pub exclude: Vec<String>,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format: human, json
    #[arg(long, default_value = "human")]
    pub format: String,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CatalogueArgs {
    /// Framework API descriptor
    pub file: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Release class descriptor, e.g. `Landroidx/core/Widget;`
    #[arg(value_name = "TYPE")]
    pub release: String,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
