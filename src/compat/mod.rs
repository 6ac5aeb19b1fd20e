//! Release-library to framework compatibility.
//!
//! The pass runs in three steps: load the framework API catalogue, pair
//! release classes with framework classes by simple name, then converge the
//! pairs to the largest set whose members and ancestors all line up.

pub mod candidates;
pub mod catalogue;
pub mod errors;
pub mod resolver;

pub use candidates::{CandidateMapping, SimpleNameIndex, DEFAULT_RELEASE_PREFIXES};
pub use catalogue::{CatalogueError, FrameworkApi, FrameworkCatalogue};
pub use errors::CompatError;
pub use resolver::{CompatResolver, ConvergeStats, Exclusion, ExclusionReason};
