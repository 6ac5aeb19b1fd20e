//! Fatal errors of the compatibility pass.
//!
//! Pair mismatches are never errors; they only show up as exclusions. What
//! ends up here signals inconsistent build input.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::compat::catalogue::CatalogueError;
use crate::core::types::DexType;
use crate::util::diagnostic::{suggestions, Diagnostic};

#[derive(Debug, Error)]
pub enum CompatError {
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("malformed class name `{0}`")]
    MalformedTypeName(String),

    #[error("release classes `{first}` and `{second}` share the simple name `{simple_name}`")]
    AmbiguousRelease {
        simple_name: String,
        first: DexType,
        second: DexType,
    },

    #[error("release class `{0}` is not defined in the program scope")]
    MissingClass(DexType),
}

impl CompatError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompatError::Catalogue(err) => {
                let mut diag = Diagnostic::error("failed to load framework api catalogue")
                    .with_context(err.to_string());
                if let CatalogueError::Io { path, source } = err {
                    diag = diag.with_location(path).with_context(source.to_string());
                }
                if let Some(code) = err.code() {
                    diag = diag.with_context(format!("code: {}", code));
                }
                if let Some(help) = MietteDiagnostic::help(err) {
                    diag = diag.with_suggestion(help.to_string());
                }
                diag.with_suggestion(suggestions::CHECK_CATALOGUE)
            }

            CompatError::MalformedTypeName(name) => {
                Diagnostic::error(format!("malformed class name `{}`", name))
                    .with_context("class names must look like `Lpackage/Name;`")
            }

            CompatError::AmbiguousRelease {
                simple_name,
                first,
                second,
            } => Diagnostic::error(format!(
                "release simple name `{}` is claimed by more than one class",
                simple_name
            ))
            .with_context(format!("first: {}", first))
            .with_context(format!("second: {}", second))
            .with_suggestion(suggestions::NARROW_PREFIXES)
            .with_suggestion(suggestions::EXCLUDE_RELEASE),

            CompatError::MissingClass(ty) => Diagnostic::error(format!(
                "release class `{}` has no definition in the program scope",
                ty
            ))
            .with_suggestion(suggestions::CHECK_SCOPE),
        }
    }
}
