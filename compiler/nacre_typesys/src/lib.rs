//! Type-system descriptors for the nacre AOT compiler.
//!
//! The dependency engine treats types and methods as opaque, stably
//! identified values. This crate is the source of those values:
//!
//! - [`TypeDesc`] / [`MethodDesc`]: `Copy` handles; equality is identity.
//! - [`DelegateInfo`]: a delegate target paired with its binding shape.
//! - [`TypeSystem`]: the interning tables that issue handles and answer
//!   read-only queries about them.
//!
//! Layout, generic substitution, and loading are handled elsewhere; nothing
//! here inspects more than a descriptor's structural key.

mod context;
mod data;
mod desc;

pub use context::{TypeSystem, TypeSystemError};
pub use data::{MethodData, MethodFlags, MethodSignature, TypeData};
pub use desc::{DelegateInfo, DelegateShape, MethodDesc, TypeDesc};
