//! Candidate selection.
//!
//! Release-library classes are paired with framework classes by simple name
//! (`Landroidx/core/widget/Widget;` and `Landroid/widget/Widget;` both have
//! the simple name `Widget`). Package paths differ between release and
//! framework copies, so the simple name is the only join key; names claimed
//! by more than one framework class are dropped rather than guessed at.

use std::collections::{btree_map, BTreeMap, BTreeSet, HashMap};

use crate::compat::catalogue::{FrameworkApi, FrameworkCatalogue};
use crate::compat::errors::CompatError;
use crate::core::scope::ClassSource;
use crate::core::types::{simple_name_of, DexType};

/// Default release-library naming convention.
pub const DEFAULT_RELEASE_PREFIXES: &[&str] = &["Landroidx/"];

fn simple_name(name: &str) -> Result<&str, CompatError> {
    simple_name_of(name).ok_or_else(|| CompatError::MalformedTypeName(name.to_string()))
}

/// Simple name -> the single framework class carrying it.
#[derive(Debug, Clone, Default)]
pub struct SimpleNameIndex {
    by_name: HashMap<String, DexType>,
    ambiguous: BTreeSet<String>,
}

impl SimpleNameIndex {
    /// Index every catalogue class. Framework classes present in `classes`
    /// are named by their deobfuscated name.
    pub fn new(
        catalogue: &FrameworkCatalogue,
        classes: &dyn ClassSource,
    ) -> Result<Self, CompatError> {
        let mut by_name = HashMap::new();
        let mut ambiguous = BTreeSet::new();

        for (&ty, _) in catalogue.iter() {
            let name = classes.class(ty).map_or(ty.as_str(), |cls| cls.name());
            let simple = simple_name(name)?;
            if by_name.insert(simple.to_string(), ty).is_some() {
                ambiguous.insert(simple.to_string());
            }
        }

        for name in &ambiguous {
            by_name.remove(name);
        }
        if !ambiguous.is_empty() {
            tracing::debug!(
                "dropped {} ambiguous framework simple names",
                ambiguous.len()
            );
        }

        Ok(SimpleNameIndex { by_name, ambiguous })
    }

    pub fn get(&self, simple_name: &str) -> Option<DexType> {
        self.by_name.get(simple_name).copied()
    }

    /// Simple names shared by two or more framework classes.
    pub fn ambiguous(&self) -> &BTreeSet<String> {
        &self.ambiguous
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Release class -> framework API. Only ever shrinks once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMapping {
    pairs: BTreeMap<DexType, FrameworkApi>,
}

impl CandidateMapping {
    pub(crate) fn insert(&mut self, release: DexType, api: FrameworkApi) {
        self.pairs.insert(release, api);
    }

    pub(crate) fn remove(&mut self, release: DexType) -> Option<FrameworkApi> {
        self.pairs.remove(&release)
    }

    pub fn get(&self, release: DexType) -> Option<&FrameworkApi> {
        self.pairs.get(&release)
    }

    pub fn contains(&self, release: DexType) -> bool {
        self.pairs.contains_key(&release)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, DexType, FrameworkApi> {
        self.pairs.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = DexType> + '_ {
        self.pairs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Release type -> framework type, for signature substitution.
    pub fn release_to_framework(&self) -> HashMap<DexType, DexType> {
        self.pairs
            .iter()
            .map(|(&release, api)| (release, api.class()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a CandidateMapping {
    type Item = (&'a DexType, &'a FrameworkApi);
    type IntoIter = btree_map::Iter<'a, DexType, FrameworkApi>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Pair every internal release class with the framework class of the same
/// simple name.
///
/// A class counts as release when its deobfuscated name starts with one of
/// `prefixes`. Two release classes hitting the same simple name is fatal.
pub fn select_candidates(
    index: &SimpleNameIndex,
    catalogue: &FrameworkCatalogue,
    classes: &dyn ClassSource,
    prefixes: &[String],
) -> Result<CandidateMapping, CompatError> {
    let mut mapping = CandidateMapping::default();
    let mut claimed: HashMap<String, DexType> = HashMap::new();

    for cls in classes.classes() {
        if cls.external {
            continue;
        }

        let name = cls.name();
        if !prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            continue;
        }

        let simple = simple_name(name)?;
        let Some(framework) = index.get(simple) else {
            continue;
        };
        let Some(api) = catalogue.get(framework) else {
            continue;
        };

        if let Some(first) = claimed.insert(simple.to_string(), cls.ty) {
            return Err(CompatError::AmbiguousRelease {
                simple_name: simple.to_string(),
                first,
                second: cls.ty,
            });
        }

        tracing::debug!("candidate {} -> {}", cls.ty, framework);
        mapping.insert(cls.ty, api.clone());
    }

    Ok(mapping)
}
