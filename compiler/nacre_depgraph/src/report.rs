//! Build-time dependency report.
//!
//! When edge recording is enabled the marker logs every edge it traverses.
//! The report renders those edges by symbol name, sorted, so two runs over
//! the same input produce identical text. It is meant for answering "why is
//! this in my binary?" when a closure turns out larger than expected.

use std::fmt::Write;

use parking_lot::Mutex;

use crate::error::DependencyError;
use crate::mangle::Mangler;
use crate::node::{DependencyEdge, NodeKey};

/// One traversed edge, by symbol name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportLine {
    pub source: String,
    pub target: String,
    pub reason: String,
}

/// Every (source, target, reason) triple seen during one traversal.
#[derive(Default)]
pub struct DependencyReport {
    edges: Mutex<Vec<(NodeKey, DependencyEdge)>>,
}

impl DependencyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, source: &NodeKey, edge: &DependencyEdge) {
        self.edges.lock().push((*source, *edge));
    }

    /// Number of recorded edges, duplicates included.
    pub fn len(&self) -> usize {
        self.edges.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.lock().is_empty()
    }

    /// Recorded edges rendered by symbol name, sorted and deduplicated.
    pub fn lines(&self, mangler: &Mangler<'_>) -> Result<Vec<ReportLine>, DependencyError> {
        let edges = self.edges.lock().clone();
        let mut lines = edges
            .iter()
            .map(|(source, edge)| {
                Ok(ReportLine {
                    source: mangler.mangle_node(source)?,
                    target: mangler.mangle_node(&edge.target)?,
                    reason: edge.reason.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, DependencyError>>()?;
        lines.sort();
        lines.dedup();
        Ok(lines)
    }

    /// Plain-text report, one `source -> target : reason` line per edge.
    pub fn to_text(&self, mangler: &Mangler<'_>) -> Result<String, DependencyError> {
        let mut out = String::new();
        for line in self.lines(mangler)? {
            let _ = writeln!(out, "{} -> {} : {}", line.source, line.target, line.reason);
        }
        Ok(out)
    }

    /// Graphviz rendering of the recorded edges.
    pub fn to_dot(&self, mangler: &Mangler<'_>) -> Result<String, DependencyError> {
        let mut out = String::from("digraph dependencies {\n");
        for line in self.lines(mangler)? {
            let _ = writeln!(
                out,
                "    \"{}\" -> \"{}\" [label=\"{}\"];",
                escape_dot(&line.source),
                escape_dot(&line.target),
                escape_dot(&line.reason)
            );
        }
        out.push_str("}\n");
        Ok(out)
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
