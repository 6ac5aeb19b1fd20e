//! apicompat - release-library to framework class compatibility resolver
//!
//! This crate finds the bundled compatibility classes of a Dex program that
//! can be retargeted to their platform framework equivalents: same public
//! surface, and an ancestry that is either external or itself retargetable.

pub mod compat;
pub mod core;
pub mod ops;
pub mod util;

/// Scope builders and canned inputs for unit tests.
#[cfg(test)]
pub mod test_support;

pub use crate::compat::{CandidateMapping, CompatError, CompatResolver, FrameworkApi, FrameworkCatalogue};
pub use crate::core::{DexClass, DexType, Scope, TypeSystem};
pub use crate::util::Config;
