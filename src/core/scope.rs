//! The program scope: every class the analysis knows about.
//!
//! [`ClassSource`] is the lookup capability the compatibility pass needs;
//! [`Scope`] is the in-crate implementation, loadable from a JSON scope file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::class::DexClass;
use crate::core::types::{known_types, DexType};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Class metadata lookup.
pub trait ClassSource {
    /// Look up a class definition by type.
    fn class(&self, ty: DexType) -> Option<&DexClass>;

    /// All known classes, internal and external.
    fn classes(&self) -> Box<dyn Iterator<Item = &DexClass> + '_>;

    /// `true` when `ty` is defined outside the program, or not defined at all.
    fn is_external(&self, ty: DexType) -> bool {
        self.class(ty).map_or(true, |cls| cls.external)
    }
}

/// Errors while building or loading a scope.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("failed to read scope file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scope")]
    Parse(#[from] serde_json::Error),

    #[error("failed to parse scope file `{}`", path.display())]
    InvalidFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("class `{0}` is defined more than once")]
    DuplicateClass(DexType),
}

impl ScopeError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ScopeError::Io { path, source } => Diagnostic::error("failed to read scope file")
                .with_location(path)
                .with_context(source.to_string()),

            ScopeError::Parse(source) => Diagnostic::error("failed to parse scope")
                .with_context(source.to_string())
                .with_suggestion(suggestions::CHECK_SCOPE_FORMAT),

            ScopeError::InvalidFile { path, source } => {
                Diagnostic::error("failed to parse scope file")
                    .with_location(path)
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::CHECK_SCOPE_FORMAT)
            }

            ScopeError::DuplicateClass(ty) => {
                Diagnostic::error(format!("class `{}` is defined more than once", ty))
                    .with_suggestion(suggestions::CHECK_SCOPE_FORMAT)
            }
        }
    }
}

#[derive(Deserialize)]
struct ScopeFile {
    classes: Vec<DexClass>,
}

/// An ordered, duplicate-free set of classes.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    classes: BTreeMap<DexType, DexClass>,
}

impl Scope {
    pub fn new() -> Self {
        Scope::default()
    }

    /// Build a scope, rejecting duplicate class types.
    pub fn from_classes(classes: impl IntoIterator<Item = DexClass>) -> Result<Self, ScopeError> {
        let mut scope = Scope::new();
        for cls in classes {
            scope.add_class(cls)?;
        }
        Ok(scope)
    }

    pub fn add_class(&mut self, cls: DexClass) -> Result<(), ScopeError> {
        let ty = cls.ty;
        if self.classes.insert(ty, cls).is_some() {
            return Err(ScopeError::DuplicateClass(ty));
        }
        Ok(())
    }

    /// Parse a JSON scope. Internal classes that cannot be retargeted for
    /// lack of a superclass are logged.
    pub fn from_json(json: &str) -> Result<Self, ScopeError> {
        let file: ScopeFile = serde_json::from_str(json)?;
        let scope = Self::from_classes(file.classes)?;
        for cls in scope.rootless_classes() {
            tracing::warn!(
                "class {} declares no superclass and will never be retargeted",
                cls.ty
            );
        }
        Ok(scope)
    }

    pub fn load(path: &Path) -> Result<Self, ScopeError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScopeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scope = Self::from_json(&json).map_err(|err| match err {
            ScopeError::Parse(source) => ScopeError::InvalidFile {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!("loaded {} classes from {}", scope.len(), path.display());
        Ok(scope)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Internal concrete classes, other than `Ljava/lang/Object;`, that
    /// declare no superclass.
    pub fn rootless_classes(&self) -> impl Iterator<Item = &DexClass> + '_ {
        let object = known_types::java_lang_object();
        self.classes.values().filter(move |cls| {
            !cls.external && !cls.is_interface() && cls.super_class.is_none() && cls.ty != object
        })
    }
}

impl ClassSource for Scope {
    fn class(&self, ty: DexType) -> Option<&DexClass> {
        self.classes.get(&ty)
    }

    fn classes(&self) -> Box<dyn Iterator<Item = &DexClass> + '_> {
        Box::new(self.classes.values())
    }
}
