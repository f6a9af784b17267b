//! Descriptor handles.
//!
//! A handle is an index into the [`TypeSystem`](crate::TypeSystem) tables that
//! issued it. Handles are interned upstream, so handle equality *is* descriptor
//! identity: two handles compare equal exactly when they name the same
//! descriptor.

use std::fmt;

/// Interned type descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct TypeDesc(u32);

impl TypeDesc {
    /// Null handle. Never issued by a `TypeSystem`.
    pub const INVALID: TypeDesc = TypeDesc(u32::MAX);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        TypeDesc(index)
    }

    /// Build a handle from a raw index without consulting any table.
    ///
    /// Only useful for tests and for decoding handles that crossed a
    /// serialization boundary; the result is not guaranteed to be issued.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeDesc(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "TypeDesc({})", self.0)
        } else {
            write!(f, "TypeDesc::INVALID")
        }
    }
}

/// Interned method descriptor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct MethodDesc(u32);

impl MethodDesc {
    /// Null handle. Never issued by a `TypeSystem`.
    pub const INVALID: MethodDesc = MethodDesc(u32::MAX);

    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        MethodDesc(index)
    }

    /// See [`TypeDesc::from_raw`].
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        MethodDesc(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for MethodDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "MethodDesc({})", self.0)
        } else {
            write!(f, "MethodDesc::INVALID")
        }
    }
}

/// How a delegate binds its target method.
///
/// Each shape needs a different constructor thunk, so the shape is part of a
/// delegate constructor's identity.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum DelegateShape {
    /// Instance method bound to a captured `this`.
    ClosedInstance,
    /// Static method whose first argument is captured.
    ClosedStatic,
    /// Static method, nothing captured.
    OpenStatic,
    /// Instance method whose `this` is supplied at invocation.
    OpenInstance,
}

impl DelegateShape {
    /// Short code used in symbol names.
    pub const fn code(self) -> &'static str {
        match self {
            DelegateShape::ClosedInstance => "CI",
            DelegateShape::ClosedStatic => "CS",
            DelegateShape::OpenStatic => "OS",
            DelegateShape::OpenInstance => "OI",
        }
    }
}

/// A delegate-construction record: the method a delegate will invoke plus
/// the shape of the binding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DelegateInfo {
    pub target: MethodDesc,
    pub shape: DelegateShape,
}

impl DelegateInfo {
    pub const fn new(target: MethodDesc, shape: DelegateShape) -> Self {
        DelegateInfo { target, shape }
    }
}
