//! Command implementations

pub mod catalogue;
pub mod completions;
pub mod explain;
pub mod resolve;

use anyhow::{Context, Result};

use crate::cli::InputArgs;
use apicompat::ops::AnalyzeOptions;
use apicompat::util::config::{global_config_path, load_config, Config, CONFIG_FILE_NAME};

/// Merge config files with command-line inputs.
///
/// An explicit `--config` must load; the implicit project file may be absent.
pub fn analyze_options(input: InputArgs) -> Result<AnalyzeOptions> {
    let config = match &input.config {
        Some(path) => {
            let mut config = Config::default();
            if let Some(global) = global_config_path() {
                config.merge(Config::load_or_default(&global));
            }
            config.merge(Config::load(path)?);
            config
        }
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            load_config(global_config_path().as_deref(), &cwd.join(CONFIG_FILE_NAME))
        }
    };

    AnalyzeOptions::from_config(
        &config,
        input.scope,
        input.catalogue,
        input.release_prefixes,
        input.exclude,
    )
}
