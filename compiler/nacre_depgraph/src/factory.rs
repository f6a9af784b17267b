//! Sharded node registry.
//!
//! The factory is the single source of truth for "does a node for X exist".
//! Every request for a [`NodeKey`] goes through [`NodeFactory::get_or_create`],
//! which returns the one canonical [`Node`] for that identity.
//!
//! # Thread Safety
//! Keys hash to one of 16 shards, each behind its own `RwLock`. Lookups take
//! the read lock; a miss validates the key, takes the write lock, and checks
//! again before constructing. Construction only ever happens under the write
//! lock, so when threads race on one identity exactly one node is built and
//! every caller receives it.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nacre_typesys::{MethodDesc, TypeSystem};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::DependencyError;
use crate::node::{HelperId, HelperTarget, Node, NodeKey, NodeRef};

/// Number of registry shards.
const NUM_SHARDS: usize = 16;

/// Interning factory for dependency-graph nodes.
pub struct NodeFactory<'ts> {
    types: &'ts TypeSystem,
    shards: [RwLock<FxHashMap<NodeKey, NodeRef>>; NUM_SHARDS],
    total_count: AtomicUsize,
}

impl<'ts> NodeFactory<'ts> {
    pub fn new(types: &'ts TypeSystem) -> Self {
        NodeFactory {
            types,
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
            total_count: AtomicUsize::new(0),
        }
    }

    /// The type system whose descriptors this factory's nodes target.
    pub fn types(&self) -> &'ts TypeSystem {
        self.types
    }

    #[inline]
    fn shard_for(key: &NodeKey) -> usize {
        let mut hasher = rustc_hash::FxHasher::default();
        key.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash = hasher.finish() as usize;
        hash % NUM_SHARDS
    }

    /// Return the canonical node for `key`, creating it on first request.
    ///
    /// Fails if `key` targets a null or unknown descriptor, or if a helper's
    /// payload has the wrong shape. Failures never register anything.
    pub fn get_or_create(&self, key: NodeKey) -> Result<NodeRef, DependencyError> {
        let shard = &self.shards[Self::shard_for(&key)];

        // Fast path: already interned, and therefore already validated
        if let Some(node) = shard.read().get(&key) {
            return Ok(Arc::clone(node));
        }

        self.validate(&key)?;

        let mut guard = shard.write();
        // Double-check after acquiring the write lock
        if let Some(node) = guard.get(&key) {
            return Ok(Arc::clone(node));
        }

        let node = Arc::new(Node::new(key));
        guard.insert(key, Arc::clone(&node));
        self.total_count.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(node = ?key, "created node");
        Ok(node)
    }

    /// The node for `key`, if one has been created.
    pub fn lookup(&self, key: &NodeKey) -> Option<NodeRef> {
        self.shards[Self::shard_for(key)].read().get(key).cloned()
    }

    pub fn helper(
        &self,
        id: HelperId,
        target: impl Into<HelperTarget>,
    ) -> Result<NodeRef, DependencyError> {
        self.get_or_create(NodeKey::helper(id, target))
    }

    pub fn virtual_method_use(&self, method: MethodDesc) -> Result<NodeRef, DependencyError> {
        self.get_or_create(NodeKey::VirtualMethodUse(method))
    }

    pub fn method_entry(&self, method: MethodDesc) -> Result<NodeRef, DependencyError> {
        self.get_or_create(NodeKey::MethodEntry(method))
    }

    /// Number of nodes created so far (O(1)).
    pub fn len(&self) -> usize {
        self.total_count.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn validate(&self, key: &NodeKey) -> Result<(), DependencyError> {
        key.check_shape()?;

        let known = match *key {
            NodeKey::Helper { target, .. } => match target {
                HelperTarget::Type(ty) => self.types.contains_type(ty),
                HelperTarget::Method(method) => self.types.contains_method(method),
                HelperTarget::Delegate(info) => self.types.contains_method(info.target),
            },
            NodeKey::VirtualMethodUse(method) | NodeKey::MethodEntry(method) => {
                self.types.contains_method(method)
            }
        };

        if known {
            Ok(())
        } else {
            Err(DependencyError::InvalidTarget {
                kind: key.kind(),
                target: target_label(key),
            })
        }
    }
}

fn target_label(key: &NodeKey) -> String {
    match key {
        NodeKey::Helper { target, .. } => match target {
            HelperTarget::Type(ty) => format!("{ty:?}"),
            HelperTarget::Method(method) => format!("{method:?}"),
            HelperTarget::Delegate(info) => format!("{:?} ({:?})", info.target, info.shape),
        },
        NodeKey::VirtualMethodUse(method) | NodeKey::MethodEntry(method) => {
            format!("{method:?}")
        }
    }
}
