//! Framework API catalogue.
//!
//! The catalogue lists, for each framework class, the public methods and
//! fields that are known to exist on the platform. It is loaded once from a
//! whitespace-tokenized descriptor:
//!
//! ```text
//! <framework_class> <num_methods> <num_fields>
//!     M <method>
//!     ...
//!     F <field>
//!     ...
//! ```
//!
//! Members use the canonical textual reference encoding
//! (`Landroid/widget/Widget;.draw:()V`, `Landroid/widget/Widget;.size:I`).

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::str::{Lines, SplitWhitespace};
use std::sync::Arc;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::member::{FieldRef, MethodRef, Proto};
use crate::core::types::{DexType, SignatureError};
use crate::util::hash::sha256_bytes;
use crate::util::InternedString;

/// Fatal problems with a framework API descriptor.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum CatalogueError {
    #[error("failed to open framework api file `{}`", path.display())]
    #[diagnostic(code(apicompat::catalogue::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected {expected}, found end of input")]
    #[diagnostic(
        code(apicompat::catalogue::truncated),
        help("the record declares more members than it lists")
    )]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("line {line}: invalid {what} `{token}`")]
    #[diagnostic(code(apicompat::catalogue::count))]
    InvalidCount {
        line: usize,
        what: &'static str,
        token: String,
    },

    #[error("line {line}: expected tag `{expected}`, found `{found}`")]
    #[diagnostic(code(apicompat::catalogue::tag))]
    UnexpectedTag {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: {source}")]
    #[diagnostic(code(apicompat::catalogue::signature))]
    InvalidSignature {
        line: usize,
        #[source]
        source: SignatureError,
    },

    #[error("line {line}: duplicated class `{class}`")]
    #[diagnostic(
        code(apicompat::catalogue::duplicate),
        help("each framework class may appear in only one record")
    )]
    DuplicateClass { line: usize, class: DexType },
}

/// The public surface of one framework class.
///
/// Cheap to clone; candidate mappings share the catalogue's copy.
#[derive(Clone)]
pub struct FrameworkApi {
    inner: Arc<FrameworkApiInner>,
}

struct FrameworkApiInner {
    cls: DexType,
    methods: BTreeSet<MethodRef>,
    fields: BTreeSet<FieldRef>,
    method_index: HashSet<(InternedString, Proto)>,
    field_index: HashSet<(InternedString, DexType)>,
}

impl FrameworkApi {
    pub fn new(cls: DexType, methods: BTreeSet<MethodRef>, fields: BTreeSet<FieldRef>) -> Self {
        let method_index = methods
            .iter()
            .map(|m| (m.name, m.proto.clone()))
            .collect();
        let field_index = fields.iter().map(|f| (f.name, f.ty)).collect();

        FrameworkApi {
            inner: Arc::new(FrameworkApiInner {
                cls,
                methods,
                fields,
                method_index,
                field_index,
            }),
        }
    }

    /// The framework class this surface belongs to.
    pub fn class(&self) -> DexType {
        self.inner.cls
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodRef> {
        self.inner.methods.iter()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldRef> {
        self.inner.fields.iter()
    }

    /// Whether a method with this name and proto exists, regardless of the
    /// class recorded on the reference.
    pub fn has_method(&self, name: InternedString, proto: &Proto) -> bool {
        self.inner.method_index.contains(&(name, proto.clone()))
    }

    pub fn has_field(&self, name: InternedString, ty: DexType) -> bool {
        self.inner.field_index.contains(&(name, ty))
    }
}

impl std::fmt::Debug for FrameworkApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkApi")
            .field("cls", &self.inner.cls)
            .field("methods", &self.inner.methods.len())
            .field("fields", &self.inner.fields.len())
            .finish()
    }
}

impl PartialEq for FrameworkApi {
    fn eq(&self, other: &Self) -> bool {
        self.inner.cls == other.inner.cls
            && self.inner.methods == other.inner.methods
            && self.inner.fields == other.inner.fields
    }
}

impl Eq for FrameworkApi {}

/// Immutable framework class -> API mapping.
#[derive(Debug, Clone, Default)]
pub struct FrameworkCatalogue {
    classes: BTreeMap<DexType, FrameworkApi>,
    digest: String,
}

/// Whitespace tokenizer that remembers which line each token came from.
struct Tokens<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    current: Option<(usize, SplitWhitespace<'a>)>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            lines: text.lines().enumerate(),
            current: None,
            last_line: 1,
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        loop {
            if let Some((line, words)) = self.current.as_mut() {
                if let Some(word) = words.next() {
                    return Some((*line, word));
                }
            }
            let (idx, line) = self.lines.next()?;
            self.last_line = idx + 1;
            self.current = Some((idx + 1, line.split_whitespace()));
        }
    }

    fn expect(&mut self, expected: &'static str) -> Result<(usize, &'a str), CatalogueError> {
        self.next().ok_or(CatalogueError::UnexpectedEof {
            line: self.last_line,
            expected,
        })
    }

    fn count(&mut self, what: &'static str) -> Result<usize, CatalogueError> {
        let (line, token) = self.expect(what)?;
        token.parse().map_err(|_| CatalogueError::InvalidCount {
            line,
            what,
            token: token.to_string(),
        })
    }

    /// Read a `<tag> <signature>` pair.
    fn tagged(
        &mut self,
        tag: &'static str,
        what: &'static str,
    ) -> Result<(usize, &'a str), CatalogueError> {
        let (line, found) = self.expect(what)?;
        if found != tag {
            return Err(CatalogueError::UnexpectedTag {
                line,
                expected: tag,
                found: found.to_string(),
            });
        }
        self.expect(what)
    }
}

impl FrameworkCatalogue {
    /// Parse a catalogue from descriptor text.
    pub fn parse(text: &str) -> Result<Self, CatalogueError> {
        let mut tokens = Tokens::new(text);
        let mut classes = BTreeMap::new();

        while let Some((line, cls)) = tokens.next() {
            let cls = DexType::class(cls)
                .map_err(|source| CatalogueError::InvalidSignature { line, source })?;
            if classes.contains_key(&cls) {
                return Err(CatalogueError::DuplicateClass { line, class: cls });
            }

            let num_methods = tokens.count("method count")?;
            let num_fields = tokens.count("field count")?;

            let mut methods = BTreeSet::new();
            for _ in 0..num_methods {
                let (line, sig) = tokens.tagged("M", "method")?;
                let mref = sig
                    .parse::<MethodRef>()
                    .map_err(|source| CatalogueError::InvalidSignature { line, source })?;
                methods.insert(mref);
            }

            let mut fields = BTreeSet::new();
            for _ in 0..num_fields {
                let (line, sig) = tokens.tagged("F", "field")?;
                let fref = sig
                    .parse::<FieldRef>()
                    .map_err(|source| CatalogueError::InvalidSignature { line, source })?;
                fields.insert(fref);
            }

            classes.insert(cls, FrameworkApi::new(cls, methods, fields));
        }

        Ok(FrameworkCatalogue {
            classes,
            digest: sha256_bytes(text.as_bytes()),
        })
    }

    /// Load a catalogue from a descriptor file.
    pub fn load(path: &Path) -> Result<Self, CatalogueError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalogue = Self::parse(&text)?;
        tracing::info!(
            "loaded framework api for {} classes from {}",
            catalogue.len(),
            path.display()
        );
        Ok(catalogue)
    }

    pub fn get(&self, cls: DexType) -> Option<&FrameworkApi> {
        self.classes.get(&cls)
    }

    pub fn contains(&self, cls: DexType) -> bool {
        self.classes.contains_key(&cls)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DexType, &FrameworkApi)> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// SHA-256 of the descriptor text.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn method_count(&self) -> usize {
        self.classes.values().map(|api| api.inner.methods.len()).sum()
    }

    pub fn field_count(&self) -> usize {
        self.classes.values().map(|api| api.inner.fields.len()).sum()
    }
}
