//! The set of nodes reached by marking.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::node::{NodeKey, NodeRef};

/// The edge that first brought a node into the set.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MarkReason {
    pub source: NodeKey,
    pub reason: &'static str,
}

/// One step of a [`MarkedSet::why_marked`] explanation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MarkStep {
    pub source: NodeKey,
    pub target: NodeKey,
    pub reason: &'static str,
}

struct MarkEntry {
    node: NodeRef,
    /// `None` for roots.
    via: Option<MarkReason>,
}

/// Concurrent, grow-only set of marked nodes.
///
/// Insertion is idempotent: inserting a node that is already present is a
/// no-op that reports `false`, whichever thread got there first.
#[derive(Default)]
pub struct MarkedSet {
    entries: DashMap<NodeKey, MarkEntry>,
}

impl MarkedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, returning whether this call added it.
    pub fn insert(&self, node: &NodeRef, via: Option<MarkReason>) -> bool {
        match self.entries.entry(*node.key()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(MarkEntry {
                    node: NodeRef::clone(node),
                    via,
                });
                true
            }
        }
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &NodeKey) -> Option<NodeRef> {
        self.entries.get(key).map(|entry| NodeRef::clone(&entry.node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marked nodes in unspecified order.
    pub fn nodes(&self) -> Vec<NodeRef> {
        self.entries
            .iter()
            .map(|entry| NodeRef::clone(&entry.node))
            .collect()
    }

    /// Whether `key` was marked as a root.
    pub fn is_root(&self, key: &NodeKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.via.is_none())
    }

    /// The chain of first-marking edges leading from a root to `key`,
    /// root first. Empty for roots and for nodes that were never marked.
    pub fn why_marked(&self, key: &NodeKey) -> Vec<MarkStep> {
        let mut chain = Vec::new();
        let mut current = *key;
        let limit = self.entries.len();
        // Each node's first-marking source was marked before it, so the walk
        // reaches a root in at most `len()` steps.
        loop {
            let via = self.entries.get(&current).and_then(|entry| entry.via);
            let Some(via) = via else { break };
            chain.push(MarkStep {
                source: via.source,
                target: current,
                reason: via.reason,
            });
            current = via.source;
            if chain.len() > limit {
                break;
            }
        }
        chain.reverse();
        chain
    }
}
