//! Worklist marking.
//!
//! Computes the transitive closure of the root set. Each popped node has its
//! dependencies computed (once, memoized on the node) and every edge target
//! not yet in the [`MarkedSet`] is marked and queued. Membership in the
//! marked set is the only visited check, which is what makes cycles safe:
//! an already-marked node is never queued again.
//!
//! Two strategies produce the same set:
//!
//! - **Sequential**: a `VecDeque` worklist on the calling thread.
//! - **Parallel**: frontier-at-a-time expansion on a dedicated rayon pool.
//!   A node joins the next frontier only on the thread whose insertion
//!   into the marked set succeeded.

use std::collections::VecDeque;

use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::context::CompilationContext;
use crate::error::DependencyError;
use crate::marked_set::{MarkReason, MarkedSet};
use crate::node::NodeRef;
use crate::report::DependencyReport;

/// Result of one marking run.
pub struct MarkOutcome {
    pub marked: MarkedSet,
    /// Present when edge recording was enabled.
    pub report: Option<DependencyReport>,
}

/// Transitive-closure marker over one compilation.
pub struct Marker<'a> {
    ctx: CompilationContext<'a>,
    config: AnalysisConfig,
}

impl<'a> Marker<'a> {
    pub fn new(ctx: CompilationContext<'a>, config: AnalysisConfig) -> Self {
        Marker { ctx, config }
    }

    /// Mark everything reachable from `roots`, roots included.
    pub fn mark(&self, roots: &[NodeRef]) -> Result<MarkOutcome, DependencyError> {
        if roots.is_empty() {
            tracing::warn!("dependency marking started with an empty root set");
        }

        let marked = MarkedSet::new();
        let report = self.config.record_edges.then(DependencyReport::new);

        let seeds: Vec<NodeRef> = roots
            .iter()
            .filter(|root| marked.insert(root, None))
            .cloned()
            .collect();

        if self.config.parallel && self.config.effective_threads() > 1 {
            self.mark_parallel(seeds, &marked, report.as_ref())?;
        } else {
            self.mark_sequential(seeds, &marked, report.as_ref())?;
        }

        tracing::debug!(
            roots = roots.len(),
            marked = marked.len(),
            nodes_created = self.ctx.factory().len(),
            "dependency marking complete"
        );

        Ok(MarkOutcome { marked, report })
    }

    fn mark_sequential(
        &self,
        seeds: Vec<NodeRef>,
        marked: &MarkedSet,
        report: Option<&DependencyReport>,
    ) -> Result<(), DependencyError> {
        let mut worklist: VecDeque<NodeRef> = seeds.into();
        while let Some(node) = worklist.pop_front() {
            worklist.extend(self.expand(&node, marked, report)?);
        }
        Ok(())
    }

    fn mark_parallel(
        &self,
        seeds: Vec<NodeRef>,
        marked: &MarkedSet,
        report: Option<&DependencyReport>,
    ) -> Result<(), DependencyError> {
        let threads = self.config.effective_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("nacre-mark-{i}"))
            .build()
            .map_err(|e| DependencyError::ThreadPool(e.to_string()))?;

        pool.install(|| {
            let mut frontier = seeds;
            let mut round = 0usize;
            while !frontier.is_empty() {
                tracing::trace!(round, width = frontier.len(), "expanding frontier");
                let discovered = frontier
                    .par_iter()
                    .map(|node| self.expand(node, marked, report))
                    .collect::<Result<Vec<_>, DependencyError>>()?;
                frontier = discovered.into_iter().flatten().collect();
                round += 1;
            }
            Ok(())
        })
    }

    /// Compute `node`'s edges and mark their targets. Returns the targets
    /// this call newly marked.
    fn expand(
        &self,
        node: &NodeRef,
        marked: &MarkedSet,
        report: Option<&DependencyReport>,
    ) -> Result<Vec<NodeRef>, DependencyError> {
        let edges = node.dependencies(&self.ctx)?;
        let mut newly_marked = Vec::new();

        for edge in edges.iter() {
            if let Some(report) = report {
                report.record(node.key(), edge);
            }
            if marked.contains(&edge.target) {
                continue;
            }
            let target = self.ctx.factory().get_or_create(edge.target)?;
            let via = MarkReason {
                source: *node.key(),
                reason: edge.reason,
            };
            if marked.insert(&target, Some(via)) {
                tracing::trace!(source = ?node.key(), target = ?edge.target, reason = edge.reason, "marked");
                newly_marked.push(target);
            }
        }

        Ok(newly_marked)
    }
}
