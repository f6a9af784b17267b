//! End-to-end analysis: mark from the roots, then fix the emission order.

use crate::config::AnalysisConfig;
use crate::context::CompilationContext;
use crate::emission::EmissionOrder;
use crate::error::DependencyError;
use crate::marked_set::MarkedSet;
use crate::marker::{MarkOutcome, Marker};
use crate::node::NodeRef;
use crate::report::DependencyReport;

/// Everything the backend and build diagnostics need from one analysis.
pub struct AnalysisOutput {
    pub marked: MarkedSet,
    pub order: EmissionOrder,
    pub report: Option<DependencyReport>,
}

/// Run dependency analysis from `roots`.
///
/// A fatal error anywhere aborts the analysis; no partial output is
/// returned.
pub fn analyze(
    ctx: CompilationContext<'_>,
    roots: &[NodeRef],
    config: AnalysisConfig,
) -> Result<AnalysisOutput, DependencyError> {
    let MarkOutcome { marked, report } = Marker::new(ctx, config).mark(roots)?;
    let order = EmissionOrder::from_nodes(marked.nodes(), &ctx.mangler())?;
    Ok(AnalysisOutput {
        marked,
        order,
        report,
    })
}
