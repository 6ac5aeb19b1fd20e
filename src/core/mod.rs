//! Core program model.
//!
//! - Interned type descriptors and member references
//! - Class metadata and the program scope
//! - The type hierarchy oracle

pub mod class;
pub mod hierarchy;
pub mod member;
pub mod scope;
pub mod types;

pub use class::{Access, AccessFlags, DexClass, DexField, DexMethod};
pub use hierarchy::{TypeHierarchy, TypeSystem};
pub use member::{FieldRef, MethodRef, Proto};
pub use scope::{ClassSource, Scope, ScopeError};
pub use types::{known_types, DexType, SignatureError};
