//! Configuration file support.
//!
//! Two locations are consulted:
//! - Global: `~/.apicompat/config.toml` - user-wide defaults
//! - Project: `apicompat.toml` (or the file given with `--config`)
//!
//! Project config takes precedence over global config; command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compat::candidates::DEFAULT_RELEASE_PREFIXES;

/// Project config file name.
pub const CONFIG_FILE_NAME: &str = "apicompat.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub release: ReleaseConfig,
    pub catalogue: CatalogueConfig,
    pub filter: FilterConfig,
}

/// How release-library classes are recognized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseConfig {
    /// Deobfuscated-name prefixes (e.g. `Landroidx/`). Unset means the
    /// built-in default.
    pub prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogueConfig {
    /// Framework API descriptor file
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Release class descriptors to exclude after convergence
    pub exclude: Vec<String>,
}

impl Config {
    /// Load a config file. A relative catalogue path is taken relative to
    /// the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if let (Some(catalogue), Some(dir)) = (config.catalogue.path.as_mut(), path.parent()) {
            if catalogue.is_relative() {
                *catalogue = dir.join(&*catalogue);
            }
        }

        Ok(config)
    }

    /// Load, falling back to defaults when the file is absent or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Exclusions accumulate; every other setting is replaced when set.
    pub fn merge(&mut self, other: Config) {
        if other.release.prefixes.is_some() {
            self.release.prefixes = other.release.prefixes;
        }
        if other.catalogue.path.is_some() {
            self.catalogue.path = other.catalogue.path;
        }
        for ty in other.filter.exclude {
            if !self.filter.exclude.contains(&ty) {
                self.filter.exclude.push(ty);
            }
        }
    }

    /// Effective release prefixes.
    pub fn release_prefixes(&self) -> Vec<String> {
        match &self.release.prefixes {
            Some(prefixes) => prefixes.clone(),
            None => DEFAULT_RELEASE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config
/// 2. Global config (~/.apicompat/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global) = global_path {
        config.merge(Config::load_or_default(global));
    }
    config.merge(Config::load_or_default(project_path));

    config
}

/// The global config directory (~/.apicompat).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".apicompat"))
}

/// The global config path (~/.apicompat/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.catalogue.path.is_none());
        assert!(config.filter.exclude.is_empty());
        assert_eq!(config.release_prefixes(), vec!["Landroidx/".to_string()]);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[release]
prefixes = ["Landroidx/", "Landroid/support/"]

[catalogue]
path = "framework_api.txt"

[filter]
exclude = ["Landroidx/core/Unsafe;"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.release_prefixes().len(), 2);
        assert_eq!(
            config.catalogue.path,
            Some(tmp.path().join("framework_api.txt"))
        );
        assert_eq!(config.filter.exclude, vec!["Landroidx/core/Unsafe;"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[release]\nprefix = \"Landroidx/\"\n").unwrap();

        assert!(Config::load(&path).is_err());
        assert!(Config::load_or_default(&path).release.prefixes.is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.catalogue.path = Some(PathBuf::from("global.txt"));
        base.filter.exclude = vec!["La/A;".to_string()];

        let mut project = Config::default();
        project.release.prefixes = Some(vec!["Lcom/compat/".to_string()]);
        project.filter.exclude = vec!["La/A;".to_string(), "La/B;".to_string()];

        base.merge(project);

        assert_eq!(base.catalogue.path, Some(PathBuf::from("global.txt")));
        assert_eq!(base.release_prefixes(), vec!["Lcom/compat/".to_string()]);
        assert_eq!(base.filter.exclude, vec!["La/A;", "La/B;"]);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join(CONFIG_FILE_NAME);
        std::fs::write(&global, "[catalogue]\npath = \"g.txt\"\n[release]\nprefixes = [\"Lg/\"]\n")
            .unwrap();
        std::fs::write(&project, "[release]\nprefixes = [\"Lp/\"]\n").unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.catalogue.path, Some(tmp.path().join("g.txt")));
        assert_eq!(config.release_prefixes(), vec!["Lp/".to_string()]);
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("absent.toml"));
        assert_eq!(config.release_prefixes(), vec!["Landroidx/".to_string()]);
    }
}
