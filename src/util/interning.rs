//! String interning for descriptors and member names.
//!
//! Dex descriptors repeat heavily across a program scope (every method proto
//! mentions `Ljava/lang/String;`), so every descriptor and member name is
//! stored once in a process-wide pool. Equality on an [`InternedString`] is
//! a pointer comparison. Hashing goes by content so that `&str` lookups
//! through [`Borrow<str>`] find the same bucket; equal contents always share
//! one pointer, so the two agree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

static POOL: LazyLock<RwLock<HashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(HashSet::new()));

/// A pooled string with pointer equality.
#[derive(Clone, Copy)]
pub struct InternedString {
    inner: &'static str,
}

impl InternedString {
    /// Intern `s`, reusing the pooled copy when one exists.
    pub fn new(s: impl AsRef<str>) -> Self {
        let s = s.as_ref();

        if let Some(&pooled) = POOL
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(s)
        {
            return InternedString { inner: pooled };
        }

        let mut pool = POOL.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(&pooled) = pool.get(s) {
            return InternedString { inner: pooled };
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        pool.insert(leaked);
        InternedString { inner: leaked }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.inner
    }
}

impl Deref for InternedString {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.inner
    }
}

impl AsRef<str> for InternedString {
    #[inline]
    fn as_ref(&self) -> &str {
        self.inner
    }
}

impl Borrow<str> for InternedString {
    #[inline]
    fn borrow(&self) -> &str {
        self.inner
    }
}

impl PartialEq for InternedString {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.inner, other.inner)
    }
}

impl Eq for InternedString {}

impl PartialOrd for InternedString {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ordering is by content so ordered maps iterate deterministically.
impl Ord for InternedString {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(other.inner)
    }
}

impl Hash for InternedString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state)
    }
}

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.inner, f)
    }
}

impl fmt::Display for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.inner)
    }
}

impl From<&str> for InternedString {
    fn from(s: &str) -> Self {
        InternedString::new(s)
    }
}

impl From<String> for InternedString {
    fn from(s: String) -> Self {
        InternedString::new(s)
    }
}

impl Serialize for InternedString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.inner)
    }
}

impl<'de> Deserialize<'de> for InternedString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(InternedString::new(s))
    }
}
