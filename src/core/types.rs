//! Type descriptors.
//!
//! A [`DexType`] is an interned descriptor in the Dex encoding: a single
//! character for primitives (`V Z B S C I J F D`), `Lpkg/Name;` for classes
//! and a `[` prefix per array dimension.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::InternedString;

/// Errors produced while parsing descriptors and member references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("empty type descriptor")]
    Empty,

    #[error("invalid type descriptor `{0}`")]
    InvalidType(String),

    #[error("`{0}` is not a class descriptor")]
    NotAClass(String),

    #[error("invalid method reference `{0}`")]
    InvalidMethod(String),

    #[error("invalid field reference `{0}`")]
    InvalidField(String),
}

/// An interned type descriptor.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DexType(InternedString);

impl DexType {
    /// Parse and intern a complete descriptor.
    pub fn new(descriptor: &str) -> Result<Self, SignatureError> {
        let (ty, rest) = parse_type_prefix(descriptor)?;
        if !rest.is_empty() {
            return Err(SignatureError::InvalidType(descriptor.to_string()));
        }
        Ok(ty)
    }

    /// Parse a descriptor that must name a class (`L...;`).
    pub fn class(descriptor: &str) -> Result<Self, SignatureError> {
        let ty = Self::new(descriptor)?;
        if !ty.is_class() {
            return Err(SignatureError::NotAClass(descriptor.to_string()));
        }
        Ok(ty)
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0.as_str()
    }

    pub fn is_class(&self) -> bool {
        self.as_str().starts_with('L')
    }

    pub fn is_array(&self) -> bool {
        self.as_str().starts_with('[')
    }

    pub fn is_primitive(&self) -> bool {
        !self.is_class() && !self.is_array()
    }

    pub fn array_dimensions(&self) -> usize {
        self.as_str().bytes().take_while(|&b| b == b'[').count()
    }

    /// The innermost element type; `self` for non-arrays.
    pub fn element_type(&self) -> DexType {
        let dims = self.array_dimensions();
        if dims == 0 {
            *self
        } else {
            DexType(InternedString::new(&self.as_str()[dims..]))
        }
    }

    /// Wrap `element` in `dims` array dimensions.
    pub fn make_array(element: DexType, dims: usize) -> DexType {
        if dims == 0 {
            return element;
        }
        let mut s = "[".repeat(dims);
        s.push_str(element.as_str());
        DexType(InternedString::new(s))
    }

    /// Replace this type according to `map`.
    ///
    /// Arrays substitute their element type and keep their dimensions; types
    /// absent from the map are returned unchanged.
    pub fn substitute(&self, map: &HashMap<DexType, DexType>) -> DexType {
        let element = self.element_type();
        match map.get(&element) {
            Some(&replacement) => DexType::make_array(replacement, self.array_dimensions()),
            None => *self,
        }
    }

    /// `Lcom/foo/Bar$Baz;` -> `Bar$Baz`. `None` for non-class types and
    /// classes in the default package.
    pub fn simple_name(&self) -> Option<&'static str> {
        simple_name_of(self.as_str())
    }
}

/// Extract the simple name from a class descriptor string.
pub fn simple_name_of(descriptor: &str) -> Option<&str> {
    let body = descriptor.strip_suffix(';')?;
    let pos = body.rfind('/')?;
    let simple = &body[pos + 1..];
    (!simple.is_empty()).then_some(simple)
}

/// Parse one descriptor from the front of `s`, returning the rest.
pub(crate) fn parse_type_prefix(s: &str) -> Result<(DexType, &str), SignatureError> {
    if s.is_empty() {
        return Err(SignatureError::Empty);
    }

    let dims = s.bytes().take_while(|&b| b == b'[').count();
    let after = &s[dims..];
    let elem_len = match after.as_bytes().first() {
        Some(b'L') => match after.find(';') {
            Some(end) if end > 1 => end + 1,
            _ => return Err(SignatureError::InvalidType(s.to_string())),
        },
        Some(b'V') if dims == 0 => 1,
        Some(b'Z' | b'B' | b'S' | b'C' | b'I' | b'J' | b'F' | b'D') => 1,
        _ => return Err(SignatureError::InvalidType(s.to_string())),
    };

    let end = dims + elem_len;
    Ok((DexType(InternedString::new(&s[..end])), &s[end..]))
}

impl TryFrom<String> for DexType {
    type Error = SignatureError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DexType::new(&s)
    }
}

impl From<DexType> for String {
    fn from(ty: DexType) -> Self {
        ty.as_str().to_string()
    }
}

impl std::str::FromStr for DexType {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DexType::new(s)
    }
}

impl fmt::Debug for DexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DexType({})", self.as_str())
    }
}

impl fmt::Display for DexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known platform types.
pub mod known_types {
    use super::DexType;
    use crate::util::InternedString;

    /// The universal root of the class hierarchy.
    pub fn java_lang_object() -> DexType {
        DexType(InternedString::new("Ljava/lang/Object;"))
    }
}
