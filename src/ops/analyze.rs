//! Run the compatibility pass over files on disk.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::compat::{CompatError, CompatResolver, FrameworkCatalogue, SimpleNameIndex};
use crate::core::{DexType, Scope, TypeSystem};
use crate::ops::report::{AnalysisReport, CatalogueSummary};
use crate::util::Config;

/// Effective inputs of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Framework API descriptor
    pub catalogue_path: PathBuf,

    /// JSON program scope
    pub scope_path: PathBuf,

    /// Deobfuscated-name prefixes identifying release classes
    pub release_prefixes: Vec<String>,

    /// Release classes to drop after the first convergence
    pub exclude: Vec<String>,
}

impl AnalyzeOptions {
    /// Combine loaded configuration with command-line overrides.
    ///
    /// A catalogue or prefix list given on the command line replaces the
    /// configured one; exclusions from both are applied.
    pub fn from_config(
        config: &Config,
        scope_path: PathBuf,
        catalogue_path: Option<PathBuf>,
        release_prefixes: Vec<String>,
        exclude: Vec<String>,
    ) -> Result<Self> {
        let Some(catalogue_path) = catalogue_path.or_else(|| config.catalogue.path.clone()) else {
            bail!("no framework api file given; pass --catalogue or set `[catalogue] path`");
        };

        let release_prefixes = if release_prefixes.is_empty() {
            config.release_prefixes()
        } else {
            release_prefixes
        };

        let mut all_excludes = config.filter.exclude.clone();
        for ty in exclude {
            if !all_excludes.contains(&ty) {
                all_excludes.push(ty);
            }
        }

        Ok(AnalyzeOptions {
            catalogue_path,
            scope_path,
            release_prefixes,
            exclude: all_excludes,
        })
    }
}

/// Load both inputs, converge, apply the exclusion filter and report.
pub fn analyze(options: &AnalyzeOptions) -> Result<AnalysisReport> {
    let catalogue = FrameworkCatalogue::load(&options.catalogue_path).map_err(CompatError::from)?;
    let scope = Scope::load(&options.scope_path)?;
    let types = TypeSystem::new(&scope);

    let mut resolver = CompatResolver::new(catalogue, &scope, &types, &options.release_prefixes)?;

    let excluded = parse_types(&options.exclude)?;
    if !excluded.is_empty() {
        let stats = resolver.filter(excluded)?;
        tracing::info!("filter removed {} pairs in {} passes", stats.removed, stats.passes);
    }

    Ok(AnalysisReport::from_resolver(&resolver))
}

/// Load a catalogue on its own and summarize it.
pub fn summarize_catalogue(path: &Path) -> Result<CatalogueSummary> {
    let catalogue = FrameworkCatalogue::load(path).map_err(CompatError::from)?;
    let index = SimpleNameIndex::new(&catalogue, &Scope::new())?;
    Ok(CatalogueSummary::new(&catalogue, &index))
}

fn parse_types(descriptors: &[String]) -> Result<Vec<DexType>> {
    descriptors
        .iter()
        .map(|s| DexType::class(s).with_context(|| format!("invalid class in exclude list: `{}`", s)))
        .collect()
}
