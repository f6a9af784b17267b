//! Deterministic emission order.
//!
//! The marked set has no inherent order; traversal order depends on
//! scheduling. Before handoff to the backend the set is sorted by mangled
//! name (kind as tiebreak), which makes the emitted sequence a pure function
//! of the set's contents.

use crate::error::DependencyError;
use crate::mangle::Mangler;
use crate::node::NodeRef;

/// Marked nodes in emission order, each paired with its symbol.
#[derive(Debug, Default)]
pub struct EmissionOrder {
    entries: Vec<(String, NodeRef)>,
}

impl EmissionOrder {
    /// Sort `nodes` into emission order.
    ///
    /// Fails with [`DependencyError::NameCollision`] if two distinct
    /// identities share a symbol. Repeated entries for the same node are
    /// collapsed.
    pub fn from_nodes(
        nodes: impl IntoIterator<Item = NodeRef>,
        mangler: &Mangler<'_>,
    ) -> Result<Self, DependencyError> {
        let mut entries = nodes
            .into_iter()
            .map(|node| Ok((node.mangled_name(mangler)?.to_owned(), node)))
            .collect::<Result<Vec<_>, DependencyError>>()?;

        entries.sort_by(|(a_name, a), (b_name, b)| {
            a_name
                .cmp(b_name)
                .then_with(|| a.kind().cmp(&b.kind()))
        });
        entries.dedup_by(|(_, a), (_, b)| a.key() == b.key());

        if let Some(pair) = entries.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(DependencyError::NameCollision {
                name: pair[0].0.clone(),
                first: format!("{:?}", pair[0].1.key()),
                second: format!("{:?}", pair[1].1.key()),
            });
        }

        tracing::debug!(count = entries.len(), "emission order fixed");
        Ok(EmissionOrder { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(symbol, node)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRef)> {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Symbols in emission order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef> {
        self.entries.iter().map(|(_, node)| node)
    }

    /// Position of `name` in the order, by binary search.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|(entry, _)| entry.as_str().cmp(name))
            .ok()
    }
}
