//! Class metadata: access flags, declared methods and fields.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::member::{FieldRef, MethodRef};
use crate::core::types::DexType;

/// A single access flag as it appears in scope files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Private,
    Protected,
    Static,
    Final,
    Abstract,
    Interface,
    Synthetic,
}

impl Access {
    const ALL: [Access; 8] = [
        Access::Public,
        Access::Private,
        Access::Protected,
        Access::Static,
        Access::Final,
        Access::Abstract,
        Access::Interface,
        Access::Synthetic,
    ];

    /// Dex `access_flags` bit.
    pub const fn bit(self) -> u32 {
        match self {
            Access::Public => 0x0001,
            Access::Private => 0x0002,
            Access::Protected => 0x0004,
            Access::Static => 0x0008,
            Access::Final => 0x0010,
            Access::Interface => 0x0200,
            Access::Abstract => 0x0400,
            Access::Synthetic => 0x1000,
        }
    }
}

/// A set of access flags, stored as Dex `access_flags` bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Access>", into = "Vec<Access>")]
pub struct AccessFlags(u32);

impl AccessFlags {
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, flag: Access) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn with(self, flag: Access) -> Self {
        AccessFlags(self.0 | flag.bit())
    }

    pub fn is_public(self) -> bool {
        self.contains(Access::Public)
    }
}

impl From<Vec<Access>> for AccessFlags {
    fn from(flags: Vec<Access>) -> Self {
        flags
            .into_iter()
            .fold(AccessFlags::default(), AccessFlags::with)
    }
}

impl From<AccessFlags> for Vec<Access> {
    fn from(flags: AccessFlags) -> Self {
        Access::ALL
            .into_iter()
            .filter(|&a| flags.contains(a))
            .collect()
    }
}

impl fmt::Debug for AccessFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<Access> = (*self).into();
        f.debug_tuple("AccessFlags").field(&flags).finish()
    }
}

/// A method declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexMethod {
    pub sig: MethodRef,
    #[serde(default)]
    pub access: AccessFlags,
    /// Virtual (dispatch-table) methods vs direct methods
    /// (constructors, private and static methods).
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
}

impl DexMethod {
    pub fn is_public(&self) -> bool {
        self.access.is_public()
    }
}

/// A field declared on a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexField {
    pub sig: FieldRef,
    #[serde(default)]
    pub access: AccessFlags,
}

impl DexField {
    pub fn is_public(&self) -> bool {
        self.access.is_public()
    }

    pub fn is_static(&self) -> bool {
        self.access.contains(Access::Static)
    }
}

/// Metadata for one class known to the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DexClass {
    #[serde(rename = "type")]
    pub ty: DexType,

    /// Pre-obfuscation descriptor; empty when the class was never renamed.
    #[serde(default)]
    pub deobfuscated_name: String,

    #[serde(default, rename = "super")]
    pub super_class: Option<DexType>,

    #[serde(default)]
    pub interfaces: Vec<DexType>,

    #[serde(default)]
    pub access: AccessFlags,

    /// Defined outside the analyzed program (platform/runtime).
    #[serde(default)]
    pub external: bool,

    #[serde(default)]
    pub methods: Vec<DexMethod>,

    #[serde(default)]
    pub fields: Vec<DexField>,
}

impl DexClass {
    pub fn new(ty: DexType) -> Self {
        DexClass {
            ty,
            deobfuscated_name: String::new(),
            super_class: None,
            interfaces: Vec::new(),
            access: AccessFlags::default(),
            external: false,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access.contains(Access::Interface)
    }

    /// The deobfuscated descriptor, falling back to the type descriptor.
    pub fn name(&self) -> &str {
        if self.deobfuscated_name.is_empty() {
            self.ty.as_str()
        } else {
            &self.deobfuscated_name
        }
    }

    pub fn direct_methods(&self) -> impl Iterator<Item = &DexMethod> {
        self.methods.iter().filter(|m| !m.is_virtual)
    }

    pub fn virtual_methods(&self) -> impl Iterator<Item = &DexMethod> {
        self.methods.iter().filter(|m| m.is_virtual)
    }

    pub fn static_fields(&self) -> impl Iterator<Item = &DexField> {
        self.fields.iter().filter(|f| f.is_static())
    }

    pub fn instance_fields(&self) -> impl Iterator<Item = &DexField> {
        self.fields.iter().filter(|f| !f.is_static())
    }
}
