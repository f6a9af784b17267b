//! Symbol Mangling for Dependency-Graph Nodes
//!
//! Turns a node's identity into the symbol it is emitted under. The mapping
//! is a pure function of the node key and the descriptors it names, and it
//! is injective: distinct identities always produce distinct symbols.
//!
//! # Mangling Scheme
//!
//! Output uses only `[A-Za-z0-9_$]`, which every supported object format
//! accepts.
//!
//! **Identifiers** (namespace segments, type and method names):
//!
//! - `[A-Za-z0-9_]` pass through unchanged
//! - common punctuation gets a named escape: `$` plus two uppercase letters
//!   (`<` → `$LT`, `` ` `` → `$BT`, `.` → `$DT`, ...)
//! - any other character up to U+00FF becomes `$` plus two lowercase hex
//!   digits; wider characters become `$U` plus six lowercase hex digits
//!
//! **Structure** uses markers that start with `$$`, which no escape can
//! produce:
//!
//! | Marker | Meaning |
//! |--------|---------|
//! | `$$_` | namespace separator, and namespace/name separator |
//! | `$$G` ... `$$E` | generic instantiation, `$$C` between arguments |
//! | `$$Z` | single-dimensional, zero-based array of the preceding type |
//! | `$$A<rank>` | multi-dimensional array of the preceding type |
//! | `$$P` / `$$R` | pointer to / managed reference to the preceding type |
//! | `$$T<n>` / `$$M<n>` | type / method generic parameter |
//! | `$$F` | owning type → method name |
//! | `$$S` ... `$$E` | signature, `$$C` between parameters, `$$V` before the return type |
//! | `$$D<shape>` | delegate binding shape |
//!
//! **Node prefixes** select the node kind; no prefix is a prefix of another:
//!
//! | Node | Symbol |
//! |------|--------|
//! | `NewHelper(System.String)` | `__NewHelper_System$$_String` |
//! | `VirtualCall(Object.ToString)` | `__VirtualCall_System$$_Object$$FToString$$S$$VSystem$$_String$$E` |
//! | `DelegateCtor(M, OpenStatic)` | `__DelegateCtor_<method>$$DOS` |
//! | `VirtualMethodUse(M)` | `__VirtualMethodUse_<method>` |
//! | `MethodEntry(M)` | `_nac_<method>` |

use std::fmt::Write;

use nacre_typesys::{MethodDesc, TypeData, TypeDesc, TypeSystem};

use crate::error::DependencyError;
use crate::node::{HelperId, HelperTarget, NodeKey};

/// Prefix of compiled method bodies.
pub const MANGLE_PREFIX: &str = "_nac_";

/// Prefix of "virtual method is used" facts.
pub const VIRTUAL_USE_PREFIX: &str = "__VirtualMethodUse_";

const NAMESPACE_SEP: &str = "$$_";
const GENERIC_OPEN: &str = "$$G";
const LIST_SEP: &str = "$$C";
const LIST_CLOSE: &str = "$$E";
const SZ_ARRAY: &str = "$$Z";
const ARRAY: &str = "$$A";
const POINTER: &str = "$$P";
const BY_REF: &str = "$$R";
const TYPE_PARAM: &str = "$$T";
const METHOD_PARAM: &str = "$$M";
const MEMBER_SEP: &str = "$$F";
const SIGNATURE_OPEN: &str = "$$S";
const RETURN_MARKER: &str = "$$V";
const DELEGATE_SHAPE: &str = "$$D";

/// Symbol mangler over one compilation's type system.
#[derive(Clone, Copy)]
pub struct Mangler<'ts> {
    types: &'ts TypeSystem,
}

impl<'ts> Mangler<'ts> {
    pub fn new(types: &'ts TypeSystem) -> Self {
        Mangler { types }
    }

    /// Mangle a node identity into its symbol.
    pub fn mangle_node(&self, key: &NodeKey) -> Result<String, DependencyError> {
        let mut out = String::with_capacity(64);
        match *key {
            NodeKey::Helper { id, target } => {
                out.push_str(id.symbol_prefix());
                match target {
                    HelperTarget::Type(ty) => self.encode_type(&mut out, ty)?,
                    HelperTarget::Method(method) => self.encode_method(&mut out, method)?,
                    HelperTarget::Delegate(info) => {
                        self.encode_method(&mut out, info.target)?;
                        out.push_str(DELEGATE_SHAPE);
                        out.push_str(info.shape.code());
                    }
                }
            }
            NodeKey::VirtualMethodUse(method) => {
                out.push_str(VIRTUAL_USE_PREFIX);
                self.encode_method(&mut out, method)?;
            }
            NodeKey::MethodEntry(method) => {
                out.push_str(MANGLE_PREFIX);
                self.encode_method(&mut out, method)?;
            }
        }
        Ok(out)
    }

    /// Mangled name of a type, without any node prefix.
    pub fn mangle_type(&self, ty: TypeDesc) -> Result<String, DependencyError> {
        let mut out = String::with_capacity(32);
        self.encode_type(&mut out, ty)?;
        Ok(out)
    }

    /// Mangled name of a method, without any node prefix.
    pub fn mangle_method(&self, method: MethodDesc) -> Result<String, DependencyError> {
        let mut out = String::with_capacity(64);
        self.encode_method(&mut out, method)?;
        Ok(out)
    }

    // -- Internal encoding helpers --

    fn encode_type(&self, out: &mut String, ty: TypeDesc) -> Result<(), DependencyError> {
        let data = self
            .types
            .type_data(ty)
            .ok_or_else(|| DependencyError::unknown_descriptor(ty))?;

        match data {
            TypeData::Named {
                namespace,
                name,
                instantiation,
            } => {
                // Empty segments are kept so `A..B` and `A.B` stay distinct
                if !namespace.is_empty() {
                    for segment in namespace.split('.') {
                        encode_identifier(out, segment);
                        out.push_str(NAMESPACE_SEP);
                    }
                }
                encode_identifier(out, &name);
                self.encode_instantiation(out, &instantiation)?;
            }
            TypeData::SzArray(element) => {
                self.encode_type(out, element)?;
                out.push_str(SZ_ARRAY);
            }
            TypeData::Array { element, rank } => {
                self.encode_type(out, element)?;
                let _ = write!(out, "{ARRAY}{rank}");
            }
            TypeData::Pointer(element) => {
                self.encode_type(out, element)?;
                out.push_str(POINTER);
            }
            TypeData::ByRef(element) => {
                self.encode_type(out, element)?;
                out.push_str(BY_REF);
            }
            TypeData::TypeParam(index) => {
                let _ = write!(out, "{TYPE_PARAM}{index}");
            }
            TypeData::MethodParam(index) => {
                let _ = write!(out, "{METHOD_PARAM}{index}");
            }
        }
        Ok(())
    }

    fn encode_method(&self, out: &mut String, method: MethodDesc) -> Result<(), DependencyError> {
        let data = self
            .types
            .method_data(method)
            .ok_or_else(|| DependencyError::unknown_descriptor(method))?;

        self.encode_type(out, data.owner)?;
        out.push_str(MEMBER_SEP);
        encode_identifier(out, &data.name);
        self.encode_instantiation(out, &data.instantiation)?;

        // Signature is always present so overloads never collide
        out.push_str(SIGNATURE_OPEN);
        for (i, &param) in data.signature.params.iter().enumerate() {
            if i > 0 {
                out.push_str(LIST_SEP);
            }
            self.encode_type(out, param)?;
        }
        out.push_str(RETURN_MARKER);
        if let Some(ret) = data.signature.ret {
            self.encode_type(out, ret)?;
        }
        out.push_str(LIST_CLOSE);
        Ok(())
    }

    /// Encode `$$G` + arguments joined by `$$C` + `$$E`; nothing when empty.
    fn encode_instantiation(
        &self,
        out: &mut String,
        types: &[TypeDesc],
    ) -> Result<(), DependencyError> {
        if types.is_empty() {
            return Ok(());
        }
        out.push_str(GENERIC_OPEN);
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(LIST_SEP);
            }
            self.encode_type(out, ty)?;
        }
        out.push_str(LIST_CLOSE);
        Ok(())
    }
}

/// Encode an identifier so that it contains no `$$` and decodes uniquely.
pub fn encode_identifier(out: &mut String, name: &str) {
    for c in name.chars() {
        match c {
            c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
            '<' => out.push_str("$LT"),
            '>' => out.push_str("$GT"),
            ',' => out.push_str("$CM"),
            '[' => out.push_str("$LB"),
            ']' => out.push_str("$RB"),
            '(' => out.push_str("$LP"),
            ')' => out.push_str("$RP"),
            ':' => out.push_str("$CL"),
            '-' => out.push_str("$DS"),
            '.' => out.push_str("$DT"),
            ' ' => out.push_str("$SP"),
            '`' => out.push_str("$BT"),
            c => encode_char_hex(out, c),
        }
    }
}

/// Encode a character as a hex escape (e.g. `'@'` → `"$40"`).
#[inline]
fn encode_char_hex(out: &mut String, c: char) {
    let code = u32::from(c);
    if code <= 0xFF {
        let _ = write!(out, "${code:02x}");
    } else {
        let _ = write!(out, "$U{code:06x}");
    }
}

/// Whether `name` is a symbol produced by this mangler.
#[must_use]
pub fn is_nacre_symbol(name: &str) -> bool {
    name.starts_with(MANGLE_PREFIX)
        || name.starts_with(VIRTUAL_USE_PREFIX)
        || HelperId::ALL
            .iter()
            .any(|id| name.starts_with(id.symbol_prefix()))
}

#[cfg(test)]
mod tests;
