//! Method and field references in their canonical textual encoding.
//!
//! - Method: `Lcom/foo/Bar;.name:(I[Ljava/lang/String;)V`
//! - Field: `Lcom/foo/Bar;.name:I`

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{parse_type_prefix, DexType, SignatureError};
use crate::util::InternedString;

/// A method prototype: return type and ordered parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proto {
    pub rtype: DexType,
    pub args: Vec<DexType>,
}

impl Proto {
    pub fn new(rtype: DexType, args: Vec<DexType>) -> Self {
        Proto { rtype, args }
    }

    /// Substitute the return and every parameter type through `map`.
    pub fn substitute(&self, map: &HashMap<DexType, DexType>) -> Proto {
        Proto {
            rtype: self.rtype.substitute(map),
            args: self.args.iter().map(|arg| arg.substitute(map)).collect(),
        }
    }
}

impl FromStr for Proto {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SignatureError::InvalidMethod(s.to_string());

        let mut rest = s.strip_prefix('(').ok_or_else(invalid)?;
        let mut args = Vec::new();
        while !rest.starts_with(')') {
            let (arg, tail) = parse_type_prefix(rest).map_err(|_| invalid())?;
            if arg.as_str() == "V" {
                return Err(invalid());
            }
            args.push(arg);
            rest = tail;
        }

        let rtype = DexType::new(&rest[1..]).map_err(|_| invalid())?;
        Ok(Proto { rtype, args })
    }
}

impl fmt::Display for Proto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for arg in &self.args {
            f.write_str(arg.as_str())?;
        }
        write!(f, "){}", self.rtype)
    }
}

/// Split `Lcls;.name:rest` into its three parts.
fn split_member(s: &str) -> Option<(&str, &str, &str)> {
    let dot = s.find(";.")?;
    let (class, tail) = (&s[..=dot], &s[dot + 2..]);
    let colon = tail.find(':')?;
    let (name, rest) = (&tail[..colon], &tail[colon + 1..]);
    if name.is_empty() || name.contains(['/', ';', '.']) {
        return None;
    }
    Some((class, name, rest))
}

/// A reference to a method: declaring class, name and proto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MethodRef {
    pub class: DexType,
    pub name: InternedString,
    pub proto: Proto,
}

impl MethodRef {
    pub fn new(class: DexType, name: impl Into<InternedString>, proto: Proto) -> Self {
        MethodRef {
            class,
            name: name.into(),
            proto,
        }
    }
}

impl FromStr for MethodRef {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SignatureError::InvalidMethod(s.to_string());
        let (class, name, proto) = split_member(s).ok_or_else(invalid)?;
        Ok(MethodRef {
            class: DexType::class(class).map_err(|_| invalid())?,
            name: InternedString::new(name),
            proto: proto.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class, self.name, self.proto)
    }
}

impl TryFrom<String> for MethodRef {
    type Error = SignatureError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MethodRef> for String {
    fn from(m: MethodRef) -> Self {
        m.to_string()
    }
}

/// A reference to a field: declaring class, name and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldRef {
    pub class: DexType,
    pub name: InternedString,
    pub ty: DexType,
}

impl FieldRef {
    pub fn new(class: DexType, name: impl Into<InternedString>, ty: DexType) -> Self {
        FieldRef {
            class,
            name: name.into(),
            ty,
        }
    }
}

impl FromStr for FieldRef {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SignatureError::InvalidField(s.to_string());
        let (class, name, ty) = split_member(s).ok_or_else(invalid)?;
        let ty = DexType::new(ty).map_err(|_| invalid())?;
        if ty.as_str() == "V" {
            return Err(invalid());
        }
        Ok(FieldRef {
            class: DexType::class(class).map_err(|_| invalid())?,
            name: InternedString::new(name),
            ty,
        })
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class, self.name, self.ty)
    }
}

impl TryFrom<String> for FieldRef {
    type Error = SignatureError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldRef> for String {
    fn from(f: FieldRef) -> Self {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_ref() {
        let m: MethodRef = "Landroid/widget/Widget;.draw:(I[Ljava/lang/String;)V"
            .parse()
            .unwrap();

        assert_eq!(m.class.as_str(), "Landroid/widget/Widget;");
        assert_eq!(m.name.as_str(), "draw");
        assert_eq!(m.proto.args.len(), 2);
        assert_eq!(m.proto.args[1].as_str(), "[Ljava/lang/String;");
        assert_eq!(m.proto.rtype.as_str(), "V");
        assert_eq!(
            m.to_string(),
            "Landroid/widget/Widget;.draw:(I[Ljava/lang/String;)V"
        );
    }

    #[test]
    fn test_parse_constructor_and_no_args() {
        let ctor: MethodRef = "Lfoo/Bar;.<init>:()V".parse().unwrap();
        assert_eq!(ctor.name.as_str(), "<init>");
        assert!(ctor.proto.args.is_empty());
    }

    #[test]
    fn test_reject_malformed_methods() {
        for bad in [
            "Lfoo/Bar;draw:()V",
            "Lfoo/Bar;.draw()V",
            "Lfoo/Bar;.:()V",
            "Lfoo/Bar;.draw:(V)V",
            "Lfoo/Bar;.draw:(I",
            "Lfoo/Bar;.draw:()",
            "I;.draw:()V",
        ] {
            assert!(bad.parse::<MethodRef>().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_parse_field_ref() {
        let f: FieldRef = "Lfoo/Bar;.items:[Lfoo/Item;".parse().unwrap();
        assert_eq!(f.name.as_str(), "items");
        assert_eq!(f.ty.as_str(), "[Lfoo/Item;");

        assert!("Lfoo/Bar;.x:V".parse::<FieldRef>().is_err());
        assert!("Lfoo/Bar;.x:".parse::<FieldRef>().is_err());
    }

    #[test]
    fn test_proto_substitution() {
        let proto: Proto = "(Landroidx/a/Widget;I)[Landroidx/a/Widget;".parse().unwrap();
        let mut map = HashMap::new();
        map.insert(
            DexType::new("Landroidx/a/Widget;").unwrap(),
            DexType::new("Landroid/a/Widget;").unwrap(),
        );

        assert_eq!(
            proto.substitute(&map).to_string(),
            "(Landroid/a/Widget;I)[Landroid/a/Widget;"
        );
    }
}
