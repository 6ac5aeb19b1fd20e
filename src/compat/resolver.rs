//! Fixed-point compatibility resolver.
//!
//! Starting from the candidate mapping, every pass validates each
//! release -> framework pair against a snapshot of the mapping taken at the
//! start of the pass:
//!
//! 1. Member check: every public method and field declared on the release
//!    class must exist on the framework class once release types in its
//!    signature are replaced by their framework counterparts.
//! 2. Hierarchy check: every ancestor the release class relies on must be
//!    external or itself mapped.
//!
//! Failing pairs are removed together at the end of the pass. Removing a
//! pair can break the hierarchy check of classes that extend it, so passes
//! repeat until one removes nothing.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::compat::candidates::{select_candidates, CandidateMapping, SimpleNameIndex};
use crate::compat::catalogue::{FrameworkApi, FrameworkCatalogue};
use crate::compat::errors::CompatError;
use crate::core::class::DexClass;
use crate::core::hierarchy::TypeHierarchy;
use crate::core::member::{FieldRef, MethodRef};
use crate::core::scope::ClassSource;
use crate::core::types::{known_types, DexType};

/// Why a candidate pair was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// The framework class lacks this (substituted) method.
    MissingMethod(MethodRef),
    /// The framework class lacks this (substituted) field.
    MissingField(FieldRef),
    /// An implemented or extended interface is internal and unmapped.
    UnmappedInterface(DexType),
    /// The superclass is neither the root object nor mapped.
    UnmappedSuperclass(DexType),
    /// A concrete class without any superclass.
    MissingSuperclass,
    /// Removed on request through [`CompatResolver::filter`].
    Filtered,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::MissingMethod(m) => write!(f, "framework lacks method `{}`", m),
            ExclusionReason::MissingField(fr) => write!(f, "framework lacks field `{}`", fr),
            ExclusionReason::UnmappedInterface(t) => {
                write!(f, "interface `{}` is internal and unmapped", t)
            }
            ExclusionReason::UnmappedSuperclass(t) => {
                write!(f, "superclass `{}` is internal and unmapped", t)
            }
            ExclusionReason::MissingSuperclass => write!(f, "class has no superclass"),
            ExclusionReason::Filtered => write!(f, "excluded by filter"),
        }
    }
}

/// A pair removed from the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub release: DexType,
    pub framework: DexType,
    pub reason: ExclusionReason,
    /// Pass number that removed the pair. Filtered pairs carry the number
    /// of the last pass completed before the filter.
    pub pass: usize,
}

/// Outcome of one convergence run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvergeStats {
    /// Passes executed, including the final one that removed nothing.
    pub passes: usize,
    pub removed: usize,
}

/// Owns the catalogue and the shrinking candidate mapping.
pub struct CompatResolver<'a> {
    catalogue: FrameworkCatalogue,
    classes: &'a dyn ClassSource,
    hierarchy: &'a dyn TypeHierarchy,
    mapping: CandidateMapping,
    ambiguous: BTreeSet<String>,
    initial_candidates: usize,
    exclusions: Vec<Exclusion>,
    passes: usize,
}

impl<'a> CompatResolver<'a> {
    /// Select candidates for release classes matching `prefixes` and
    /// converge them.
    pub fn new(
        catalogue: FrameworkCatalogue,
        classes: &'a dyn ClassSource,
        hierarchy: &'a dyn TypeHierarchy,
        prefixes: &[String],
    ) -> Result<Self, CompatError> {
        let index = SimpleNameIndex::new(&catalogue, classes)?;
        let mapping = select_candidates(&index, &catalogue, classes, prefixes)?;
        tracing::info!(
            "selected {} candidate release classes ({} framework classes, {} ambiguous names)",
            mapping.len(),
            catalogue.len(),
            index.ambiguous().len()
        );

        let mut resolver = Self::with_mapping(catalogue, classes, hierarchy, mapping);
        resolver.ambiguous = index.ambiguous().clone();
        resolver.converge()?;
        Ok(resolver)
    }

    /// Wrap an existing mapping without converging it.
    pub fn with_mapping(
        catalogue: FrameworkCatalogue,
        classes: &'a dyn ClassSource,
        hierarchy: &'a dyn TypeHierarchy,
        mapping: CandidateMapping,
    ) -> Self {
        CompatResolver {
            catalogue,
            classes,
            hierarchy,
            initial_candidates: mapping.len(),
            mapping,
            ambiguous: BTreeSet::new(),
            exclusions: Vec::new(),
            passes: 0,
        }
    }

    /// Remove failing pairs until a pass removes nothing.
    pub fn converge(&mut self) -> Result<ConvergeStats, CompatError> {
        let mut stats = ConvergeStats::default();

        loop {
            self.passes += 1;
            stats.passes += 1;

            let release_to_framework = self.mapping.release_to_framework();
            let mut to_remove = Vec::new();

            for (&release, api) in &self.mapping {
                let cls = self
                    .classes
                    .class(release)
                    .ok_or(CompatError::MissingClass(release))?;

                let failure = check_members(cls, api, &release_to_framework).or_else(|| {
                    check_hierarchy(cls, &release_to_framework, self.classes, self.hierarchy)
                });

                if let Some(reason) = failure {
                    tracing::debug!("pass {}: excluding {}: {}", self.passes, release, reason);
                    to_remove.push(Exclusion {
                        release,
                        framework: api.class(),
                        reason,
                        pass: self.passes,
                    });
                }
            }

            if to_remove.is_empty() {
                break;
            }

            stats.removed += to_remove.len();
            for exclusion in &to_remove {
                self.mapping.remove(exclusion.release);
            }
            self.exclusions.extend(to_remove);
        }

        tracing::info!(
            "converged after {} passes: {} pairs kept, {} removed",
            stats.passes,
            self.mapping.len(),
            stats.removed
        );
        Ok(stats)
    }

    /// Drop the given release classes and re-converge, so pairs that only
    /// held because of them go too.
    pub fn filter(
        &mut self,
        types: impl IntoIterator<Item = DexType>,
    ) -> Result<ConvergeStats, CompatError> {
        let mut filtered = 0;
        for release in types {
            if let Some(api) = self.mapping.remove(release) {
                filtered += 1;
                self.exclusions.push(Exclusion {
                    release,
                    framework: api.class(),
                    reason: ExclusionReason::Filtered,
                    pass: self.passes,
                });
            }
        }
        tracing::debug!("filter removed {} pairs", filtered);

        let mut stats = self.converge()?;
        stats.removed += filtered;
        Ok(stats)
    }

    pub fn mapping(&self) -> &CandidateMapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> CandidateMapping {
        self.mapping
    }

    pub fn catalogue(&self) -> &FrameworkCatalogue {
        &self.catalogue
    }

    /// Every removal so far, in removal order.
    pub fn exclusions(&self) -> &[Exclusion] {
        &self.exclusions
    }

    /// Framework simple names dropped from the index for being shared.
    pub fn ambiguous_names(&self) -> &BTreeSet<String> {
        &self.ambiguous
    }

    pub fn initial_candidates(&self) -> usize {
        self.initial_candidates
    }

    /// Total passes across every convergence run.
    pub fn passes(&self) -> usize {
        self.passes
    }
}

/// Public members of `cls` must exist on the framework side after
/// substitution. Non-public members are not checked.
fn check_members(
    cls: &DexClass,
    api: &FrameworkApi,
    release_to_framework: &HashMap<DexType, DexType>,
) -> Option<ExclusionReason> {
    let methods = cls.direct_methods().chain(cls.virtual_methods());
    for method in methods.filter(|m| m.is_public()) {
        let proto = method.sig.proto.substitute(release_to_framework);
        if !api.has_method(method.sig.name, &proto) {
            return Some(ExclusionReason::MissingMethod(MethodRef::new(
                api.class(),
                method.sig.name,
                proto,
            )));
        }
    }

    let fields = cls.static_fields().chain(cls.instance_fields());
    for field in fields.filter(|f| f.is_public()) {
        let ty = field.sig.ty.substitute(release_to_framework);
        if !api.has_field(field.sig.name, ty) {
            return Some(ExclusionReason::MissingField(FieldRef::new(
                api.class(),
                field.sig.name,
                ty,
            )));
        }
    }

    None
}

/// First interface in `interfaces` that is internal and unmapped.
fn first_unmapped(
    interfaces: BTreeSet<DexType>,
    release_to_framework: &HashMap<DexType, DexType>,
    classes: &dyn ClassSource,
) -> Option<DexType> {
    interfaces
        .into_iter()
        .find(|&intf| !classes.is_external(intf) && !release_to_framework.contains_key(&intf))
}

/// Everything `cls` inherits from must be external or mapped. Subclasses
/// are not inspected; only the superclass link needs to be retargetable.
fn check_hierarchy(
    cls: &DexClass,
    release_to_framework: &HashMap<DexType, DexType>,
    classes: &dyn ClassSource,
    hierarchy: &dyn TypeHierarchy,
) -> Option<ExclusionReason> {
    if cls.is_interface() {
        let supers = hierarchy.super_interfaces(cls.ty);
        return first_unmapped(supers, release_to_framework, classes)
            .map(ExclusionReason::UnmappedInterface);
    }

    let implemented = hierarchy.implemented_interfaces(cls.ty);
    if let Some(intf) = first_unmapped(implemented, release_to_framework, classes) {
        return Some(ExclusionReason::UnmappedInterface(intf));
    }

    // Deeper ancestors are covered when the superclass's own pair is checked.
    match hierarchy.super_class(cls.ty) {
        None => Some(ExclusionReason::MissingSuperclass),
        Some(sup) if sup == known_types::java_lang_object() => None,
        Some(sup) if release_to_framework.contains_key(&sup) => None,
        Some(sup) => Some(ExclusionReason::UnmappedSuperclass(sup)),
    }
}
