//! High-level operations.
//!
//! This module contains the implementation of apicompat commands.

pub mod analyze;
pub mod report;

pub use analyze::{analyze, summarize_catalogue, AnalyzeOptions};
pub use report::{
    format_report, AnalysisReport, CatalogueSummary, ExclusionEntry, Explanation, MappingEntry,
    OutputFormat, OutputFormatParseError,
};
