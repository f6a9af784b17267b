//! Descriptor tables.
//!
//! The `TypeSystem` interns [`TypeData`] and [`MethodData`] into stable
//! handles. Interning the same structure twice yields the same handle, which
//! is what lets downstream consumers compare descriptors by handle alone.
//!
//! # Thread Safety
//! Each table sits behind its own `RwLock`. Lookups take the read lock;
//! interning takes the read lock first and only upgrades to the write lock
//! on a miss, re-checking before inserting.

use std::hash::Hash;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::data::{MethodData, MethodFlags, MethodSignature, TypeData};
use crate::{MethodDesc, TypeDesc};

/// Errors raised while building descriptors.
///
/// These are well-formedness failures; a descriptor that fails here never
/// gets a handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeSystemError {
    /// A component handle was not issued by this type system.
    #[error("unknown type descriptor {0:?}")]
    UnknownType(TypeDesc),
    /// A method handle was not issued by this type system.
    #[error("unknown method descriptor {0:?}")]
    UnknownMethod(MethodDesc),
    /// Multi-dimensional arrays need a rank of at least one.
    #[error("array rank must be at least 1, found {0}")]
    InvalidRank(u32),
    /// Named types and methods need a non-empty name.
    #[error("descriptor name must not be empty")]
    EmptyName,
    /// The table ran out of `u32` indices.
    #[error("descriptor table exceeded capacity: {count} entries")]
    Overflow { count: usize },
}

/// One interning table.
struct InternTable<T> {
    map: FxHashMap<T, u32>,
    items: Vec<T>,
}

impl<T: Clone + Eq + Hash> InternTable<T> {
    fn new() -> Self {
        InternTable {
            map: FxHashMap::default(),
            items: Vec::with_capacity(64),
        }
    }

    fn get(&self, data: &T) -> Option<u32> {
        self.map.get(data).copied()
    }

    fn insert(&mut self, data: T) -> Result<u32, TypeSystemError> {
        if let Some(index) = self.get(&data) {
            return Ok(index);
        }
        let index = u32::try_from(self.items.len())
            .ok()
            .filter(|&i| i != u32::MAX)
            .ok_or(TypeSystemError::Overflow {
                count: self.items.len(),
            })?;
        self.items.push(data.clone());
        self.map.insert(data, index);
        Ok(index)
    }
}

/// Interned descriptors for one compilation.
pub struct TypeSystem {
    types: RwLock<InternTable<TypeData>>,
    methods: RwLock<InternTable<MethodData>>,
}

impl TypeSystem {
    pub fn new() -> Self {
        TypeSystem {
            types: RwLock::new(InternTable::new()),
            methods: RwLock::new(InternTable::new()),
        }
    }

    /// Intern a type descriptor, validating its component handles.
    pub fn intern_type(&self, data: TypeData) -> Result<TypeDesc, TypeSystemError> {
        if let Some(index) = self.types.read().get(&data) {
            return Ok(TypeDesc::new(index));
        }

        match &data {
            TypeData::Named { name, .. } if name.is_empty() => {
                return Err(TypeSystemError::EmptyName);
            }
            TypeData::Array { rank: 0, .. } => return Err(TypeSystemError::InvalidRank(0)),
            _ => {}
        }
        for component in data.referenced_types() {
            self.check_type(component)?;
        }

        let index = self.types.write().insert(data)?;
        Ok(TypeDesc::new(index))
    }

    /// Intern a method descriptor, validating every type it mentions.
    pub fn intern_method(&self, data: MethodData) -> Result<MethodDesc, TypeSystemError> {
        if let Some(index) = self.methods.read().get(&data) {
            return Ok(MethodDesc::new(index));
        }

        if data.name.is_empty() {
            return Err(TypeSystemError::EmptyName);
        }
        for component in data.referenced_types() {
            self.check_type(component)?;
        }

        let index = self.methods.write().insert(data)?;
        Ok(MethodDesc::new(index))
    }

    // -- Construction shorthands --

    /// A non-generic named type.
    pub fn named(&self, namespace: &str, name: &str) -> Result<TypeDesc, TypeSystemError> {
        self.generic(namespace, name, &[])
    }

    /// A named type instantiated over `args`.
    pub fn generic(
        &self,
        namespace: &str,
        name: &str,
        args: &[TypeDesc],
    ) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::Named {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            instantiation: args.to_vec(),
        })
    }

    pub fn sz_array(&self, element: TypeDesc) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::SzArray(element))
    }

    pub fn array(&self, element: TypeDesc, rank: u32) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::Array { element, rank })
    }

    pub fn pointer(&self, element: TypeDesc) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::Pointer(element))
    }

    pub fn by_ref(&self, element: TypeDesc) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::ByRef(element))
    }

    pub fn type_param(&self, index: u32) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::TypeParam(index))
    }

    pub fn method_param(&self, index: u32) -> Result<TypeDesc, TypeSystemError> {
        self.intern_type(TypeData::MethodParam(index))
    }

    /// A method on `owner` with the given signature and flags.
    pub fn method(
        &self,
        owner: TypeDesc,
        name: &str,
        signature: MethodSignature,
        flags: MethodFlags,
    ) -> Result<MethodDesc, TypeSystemError> {
        self.intern_method(MethodData::new(owner, name, signature).with_flags(flags))
    }

    // -- Queries --

    /// Whether `desc` was issued by this type system.
    pub fn contains_type(&self, desc: TypeDesc) -> bool {
        desc.is_valid() && desc.index() < self.types.read().items.len()
    }

    /// Whether `desc` was issued by this type system.
    pub fn contains_method(&self, desc: MethodDesc) -> bool {
        desc.is_valid() && desc.index() < self.methods.read().items.len()
    }

    /// Structure of a type descriptor.
    pub fn type_data(&self, desc: TypeDesc) -> Option<TypeData> {
        self.types.read().items.get(desc.index()).cloned()
    }

    /// Structure of a method descriptor.
    pub fn method_data(&self, desc: MethodDesc) -> Option<MethodData> {
        self.methods.read().items.get(desc.index()).cloned()
    }

    pub fn method_flags(&self, desc: MethodDesc) -> Option<MethodFlags> {
        self.methods.read().items.get(desc.index()).map(|m| m.flags)
    }

    pub fn type_count(&self) -> usize {
        self.types.read().items.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.read().items.len()
    }

    fn check_type(&self, desc: TypeDesc) -> Result<(), TypeSystemError> {
        if self.contains_type(desc) {
            Ok(())
        } else {
            Err(TypeSystemError::UnknownType(desc))
        }
    }
}

impl Default for TypeSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
