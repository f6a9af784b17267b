//! Dependency-analysis failures.
//!
//! Every variant is a compiler-internal consistency failure, never a problem
//! with the user's program. Diagnostics about invalid programs belong to the
//! type system; anything raised here halts the build.

use crate::node::{NodeKind, TargetShape};

/// Fatal dependency-analysis error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DependencyError {
    /// A node was requested for a null handle, or for a handle the type
    /// system never issued.
    #[error("internal compiler error: {kind} node requested for unknown descriptor {target}")]
    InvalidTarget { kind: NodeKind, target: String },

    /// A node was requested with a target of the wrong shape (e.g. a method
    /// where a type is required).
    #[error("internal compiler error: {kind} node requires a {expected} target, found {found}")]
    TargetMismatch {
        kind: NodeKind,
        expected: TargetShape,
        found: TargetShape,
    },

    /// A descriptor disappeared between node creation and naming.
    #[error("internal compiler error: descriptor {descriptor} has no type-system entry")]
    UnknownDescriptor { descriptor: String },

    /// Two distinct nodes mangled to the same symbol.
    #[error("internal compiler error: `{first}` and `{second}` both mangle to `{name}`")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// The marking thread pool could not be started.
    #[error("failed to start dependency marking workers: {0}")]
    ThreadPool(String),
}

impl DependencyError {
    pub(crate) fn unknown_descriptor(descriptor: impl std::fmt::Debug) -> Self {
        DependencyError::UnknownDescriptor {
            descriptor: format!("{descriptor:?}"),
        }
    }
}
