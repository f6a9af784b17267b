//! Descriptor contents.
//!
//! These are the structural keys the [`TypeSystem`](crate::TypeSystem)
//! interns. The dependency engine reads them only to build symbol names and
//! to answer a handful of flag queries.

use bitflags::bitflags;

use crate::TypeDesc;

/// Structure of a type descriptor.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeData {
    /// A named class, struct, or interface, possibly instantiated.
    ///
    /// `namespace` uses `.` between segments; it may be empty.
    Named {
        namespace: String,
        name: String,
        instantiation: Vec<TypeDesc>,
    },
    /// Single-dimensional, zero-based array.
    SzArray(TypeDesc),
    /// Multi-dimensional array.
    Array { element: TypeDesc, rank: u32 },
    /// Unmanaged pointer.
    Pointer(TypeDesc),
    /// Managed reference.
    ByRef(TypeDesc),
    /// Generic parameter of the enclosing type (`!n`).
    TypeParam(u32),
    /// Generic parameter of the enclosing method (`!!n`).
    MethodParam(u32),
}

impl TypeData {
    /// Descriptors this one refers to, in declaration order.
    pub fn referenced_types(&self) -> Vec<TypeDesc> {
        match self {
            TypeData::Named { instantiation, .. } => instantiation.clone(),
            TypeData::SzArray(element)
            | TypeData::Array { element, .. }
            | TypeData::Pointer(element)
            | TypeData::ByRef(element) => vec![*element],
            TypeData::TypeParam(_) | TypeData::MethodParam(_) => Vec::new(),
        }
    }
}

bitflags! {
    /// Method attributes the dependency engine cares about.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u8 {
        /// Occupies a v-table slot.
        const VIRTUAL = 1 << 0;
        /// Has no body; implies `VIRTUAL`.
        const ABSTRACT = 1 << 1;
        /// No `this` parameter.
        const STATIC = 1 << 2;
    }
}

/// Parameter and return types of a method. `ret` is `None` for `void`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct MethodSignature {
    pub params: Vec<TypeDesc>,
    pub ret: Option<TypeDesc>,
}

impl MethodSignature {
    pub fn new(params: Vec<TypeDesc>, ret: Option<TypeDesc>) -> Self {
        MethodSignature { params, ret }
    }
}

/// Structure of a method descriptor.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodData {
    pub owner: TypeDesc,
    pub name: String,
    pub instantiation: Vec<TypeDesc>,
    pub signature: MethodSignature,
    pub flags: MethodFlags,
}

impl MethodData {
    /// A non-generic, non-virtual instance method.
    pub fn new(owner: TypeDesc, name: impl Into<String>, signature: MethodSignature) -> Self {
        MethodData {
            owner,
            name: name.into(),
            instantiation: Vec::new(),
            signature,
            flags: MethodFlags::empty(),
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_instantiation(mut self, instantiation: Vec<TypeDesc>) -> Self {
        self.instantiation = instantiation;
        self
    }

    /// Every type descriptor this method refers to.
    pub fn referenced_types(&self) -> impl Iterator<Item = TypeDesc> + '_ {
        std::iter::once(self.owner)
            .chain(self.instantiation.iter().copied())
            .chain(self.signature.params.iter().copied())
            .chain(self.signature.ret)
    }
}
