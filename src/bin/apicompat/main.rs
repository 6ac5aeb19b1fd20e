//! apicompat CLI - retarget release-library classes to framework classes

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use apicompat::core::ScopeError;
use apicompat::util::diagnostic::emit;
use apicompat::CompatError;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        if let Some(err) = e.downcast_ref::<CompatError>() {
            emit(&err.to_diagnostic(), color);
        } else if let Some(err) = e.downcast_ref::<ScopeError>() {
            emit(&err.to_diagnostic(), color);
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("apicompat=debug")
    } else {
        EnvFilter::new("apicompat=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Catalogue(args) => commands::catalogue::execute(args),
        Commands::Explain(args) => commands::explain::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
