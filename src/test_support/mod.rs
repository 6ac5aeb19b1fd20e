//! Builders for program scopes used by unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use apicompat::test_support::{ClassBuilder, ScopeBuilder};
//!
//! let scope = ScopeBuilder::new()
//!     .class(
//!         ClassBuilder::class("Landroidx/core/Widget;")
//!             .public_method("draw:()V")
//!             .implements("Landroidx/core/Helper;"),
//!     )
//!     .class(ClassBuilder::interface("Landroidx/core/Helper;"))
//!     .build();
//! ```

pub mod fixtures;

use crate::core::class::{Access, AccessFlags, DexClass, DexField, DexMethod};
use crate::core::scope::Scope;
use crate::core::types::{known_types, DexType};

pub use fixtures::*;

fn ty(s: &str) -> DexType {
    DexType::new(s).unwrap_or_else(|e| panic!("bad test descriptor `{s}`: {e}"))
}

/// Fluent builder for a [`DexClass`].
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    cls: DexClass,
}

impl ClassBuilder {
    /// A public concrete class extending `Ljava/lang/Object;`.
    pub fn class(descriptor: &str) -> Self {
        let mut cls = DexClass::new(ty(descriptor));
        cls.super_class = Some(known_types::java_lang_object());
        cls.access = AccessFlags::from(vec![Access::Public]);
        ClassBuilder { cls }
    }

    /// A public interface.
    pub fn interface(descriptor: &str) -> Self {
        let mut builder = Self::class(descriptor);
        builder.cls.access = AccessFlags::from(vec![
            Access::Public,
            Access::Interface,
            Access::Abstract,
        ]);
        builder
    }

    /// A class defined outside the program.
    pub fn external(descriptor: &str) -> Self {
        let mut builder = Self::class(descriptor);
        builder.cls.external = true;
        builder
    }

    pub fn external_interface(descriptor: &str) -> Self {
        let mut builder = Self::interface(descriptor);
        builder.cls.external = true;
        builder
    }

    pub fn extends(mut self, descriptor: &str) -> Self {
        self.cls.super_class = Some(ty(descriptor));
        self
    }

    pub fn no_super(mut self) -> Self {
        self.cls.super_class = None;
        self
    }

    pub fn implements(mut self, descriptor: &str) -> Self {
        self.cls.interfaces.push(ty(descriptor));
        self
    }

    pub fn deobfuscated(mut self, name: &str) -> Self {
        self.cls.deobfuscated_name = name.to_string();
        self
    }

    /// Add a method given as `name:proto`, e.g. `draw:(I)V`.
    pub fn method(mut self, member: &str, access: &[Access], is_virtual: bool) -> Self {
        let sig = format!("{}.{}", self.cls.ty, member)
            .parse()
            .unwrap_or_else(|e| panic!("bad test method `{member}`: {e}"));
        self.cls.methods.push(DexMethod {
            sig,
            access: AccessFlags::from(access.to_vec()),
            is_virtual,
        });
        self
    }

    pub fn public_method(self, member: &str) -> Self {
        self.method(member, &[Access::Public], true)
    }

    /// Add a field given as `name:type`, e.g. `size:I`.
    pub fn field(mut self, member: &str, access: &[Access]) -> Self {
        let sig = format!("{}.{}", self.cls.ty, member)
            .parse()
            .unwrap_or_else(|e| panic!("bad test field `{member}`: {e}"));
        self.cls.fields.push(DexField {
            sig,
            access: AccessFlags::from(access.to_vec()),
        });
        self
    }

    pub fn public_field(self, member: &str) -> Self {
        self.field(member, &[Access::Public])
    }

    pub fn build(self) -> DexClass {
        self.cls
    }
}

/// Collects classes into a [`Scope`].
#[derive(Debug, Default)]
pub struct ScopeBuilder {
    classes: Vec<DexClass>,
}

impl ScopeBuilder {
    pub fn new() -> Self {
        ScopeBuilder::default()
    }

    pub fn class(mut self, builder: ClassBuilder) -> Self {
        self.classes.push(builder.build());
        self
    }

    pub fn build(self) -> Scope {
        Scope::from_classes(self.classes).unwrap_or_else(|e| panic!("bad test scope: {e}"))
    }
}
