//! Analysis reports and their renderings.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::compat::{CompatResolver, FrameworkCatalogue, SimpleNameIndex};
use crate::util::hash::Fingerprint;

/// Output format for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Machine-readable JSON output
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = OutputFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OutputFormatParseError(s.to_string())),
        }
    }
}

/// Error parsing output format option.
#[derive(Debug, Clone)]
pub struct OutputFormatParseError(pub String);

impl fmt::Display for OutputFormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid output format '{}', valid values: human, json",
            self.0
        )
    }
}

impl std::error::Error for OutputFormatParseError {}

/// A surviving release -> framework pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingEntry {
    pub release: String,
    pub framework: String,
}

/// A removed pair and why it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusionEntry {
    pub release: String,
    pub framework: String,
    pub reason: String,
    pub pass: usize,
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// SHA-256 of the framework API descriptor
    pub catalogue_digest: String,

    pub catalogue_classes: usize,

    /// Framework simple names shared by several classes
    pub ambiguous_names: Vec<String>,

    /// Pairs selected before convergence
    pub initial_candidates: usize,

    /// Passes across every convergence run
    pub passes: usize,

    /// SHA-256 over the final mapping, in release order
    pub mapping_fingerprint: String,

    pub mapping: Vec<MappingEntry>,

    /// Removed pairs, in removal order
    pub excluded: Vec<ExclusionEntry>,
}

impl AnalysisReport {
    pub fn from_resolver(resolver: &CompatResolver<'_>) -> Self {
        let mapping: Vec<MappingEntry> = resolver
            .mapping()
            .iter()
            .map(|(release, api)| MappingEntry {
                release: release.to_string(),
                framework: api.class().to_string(),
            })
            .collect();

        let mut fingerprint = Fingerprint::new();
        for entry in &mapping {
            fingerprint.update_str(&entry.release).update_str(&entry.framework);
        }

        let excluded = resolver
            .exclusions()
            .iter()
            .map(|ex| ExclusionEntry {
                release: ex.release.to_string(),
                framework: ex.framework.to_string(),
                reason: ex.reason.to_string(),
                pass: ex.pass,
            })
            .collect();

        AnalysisReport {
            catalogue_digest: resolver.catalogue().digest().to_string(),
            catalogue_classes: resolver.catalogue().len(),
            ambiguous_names: resolver.ambiguous_names().iter().cloned().collect(),
            initial_candidates: resolver.initial_candidates(),
            passes: resolver.passes(),
            mapping_fingerprint: fingerprint.finish(),
            mapping,
            excluded,
        }
    }

    /// What happened to one release class.
    pub fn explain(&self, release: &str) -> Explanation<'_> {
        if let Some(entry) = self.mapping.iter().find(|e| e.release == release) {
            return Explanation::Mapped(entry);
        }
        if let Some(entry) = self.excluded.iter().find(|e| e.release == release) {
            return Explanation::Excluded(entry);
        }
        Explanation::NotCandidate(release.to_string())
    }

    /// Human-readable view.
    pub fn human(&self) -> HumanReport<'_> {
        HumanReport(self)
    }
}

/// Outcome for a single release class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation<'a> {
    Mapped(&'a MappingEntry),
    Excluded(&'a ExclusionEntry),
    /// Never paired: outside the release prefixes, no framework class of the
    /// same simple name, or an ambiguous name.
    NotCandidate(String),
}

impl fmt::Display for Explanation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Explanation::Mapped(entry) => {
                write!(f, "{} maps to {}", entry.release, entry.framework)
            }
            Explanation::Excluded(entry) => write!(
                f,
                "{} was excluded from {} in pass {}: {}",
                entry.release, entry.framework, entry.pass, entry.reason
            ),
            Explanation::NotCandidate(release) => write!(
                f,
                "{} was never a candidate (no unique framework class shares its simple name, \
                 or it does not match a release prefix)",
                release
            ),
        }
    }
}

/// Display adapter for [`AnalysisReport`].
pub struct HumanReport<'a>(&'a AnalysisReport);

impl fmt::Display for HumanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let digest = report.catalogue_digest.as_str();
        let short_digest = digest.get(..12).unwrap_or(digest);

        writeln!(
            f,
            "Framework API: {} classes (sha256 {})",
            report.catalogue_classes, short_digest
        )?;
        writeln!(
            f,
            "Candidates: {}, kept: {}, excluded: {}, passes: {}",
            report.initial_candidates,
            report.mapping.len(),
            report.excluded.len(),
            report.passes
        )?;

        if !report.mapping.is_empty() {
            writeln!(f, "\nMapped:")?;
            for entry in &report.mapping {
                writeln!(f, "  {} -> {}", entry.release, entry.framework)?;
            }
        }

        if !report.excluded.is_empty() {
            writeln!(f, "\nExcluded:")?;
            for entry in &report.excluded {
                writeln!(f, "  [pass {}] {}: {}", entry.pass, entry.release, entry.reason)?;
            }
        }

        if !report.ambiguous_names.is_empty() {
            writeln!(f, "\nAmbiguous framework names: {}", report.ambiguous_names.join(", "))?;
        }

        Ok(())
    }
}

/// Render a report in the requested format.
pub fn format_report(report: &AnalysisReport, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Human => Ok(report.human().to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(report),
    }
}

/// Counts and names describing a loaded catalogue.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogueSummary {
    pub digest: String,
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
    /// Classes reachable through the simple-name index
    pub indexed: usize,
    pub ambiguous_names: BTreeSet<String>,
}

impl CatalogueSummary {
    pub fn new(catalogue: &FrameworkCatalogue, index: &SimpleNameIndex) -> Self {
        CatalogueSummary {
            digest: catalogue.digest().to_string(),
            classes: catalogue.len(),
            methods: catalogue.method_count(),
            fields: catalogue.field_count(),
            indexed: index.len(),
            ambiguous_names: index.ambiguous().clone(),
        }
    }
}

impl fmt::Display for CatalogueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "sha256:   {}", self.digest)?;
        writeln!(f, "classes:  {}", self.classes)?;
        writeln!(f, "methods:  {}", self.methods)?;
        writeln!(f, "fields:   {}", self.fields)?;
        writeln!(f, "indexed:  {}", self.indexed)?;
        if !self.ambiguous_names.is_empty() {
            let names: Vec<&str> = self.ambiguous_names.iter().map(String::as_str).collect();
            writeln!(f, "ambiguous: {}", names.join(", "))?;
        }
        Ok(())
    }
}
