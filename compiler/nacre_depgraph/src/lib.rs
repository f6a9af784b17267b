//! Dependency analysis for the nacre AOT compiler.
//!
//! Starting from a set of root nodes (entry points, exports), this crate
//! finds every compiled artifact the final binary must contain and hands
//! them to the backend in a deterministic order.
//!
//! # Pipeline
//!
//! ```text
//! roots ──► NodeFactory ──► Marker ──► MarkedSet ──► EmissionOrder ──► backend
//!              ▲               │
//!              └── interned ◄──┘ dependency rules
//! ```
//!
//! - [`NodeFactory`]: one canonical [`Node`] per [`NodeKey`], safe to call
//!   from any thread
//! - [`Node`]: identity plus memoized name and dependency list
//! - [`Marker`]: worklist transitive closure, sequential or parallel
//! - [`Mangler`]: pure, injective symbol naming
//! - [`EmissionOrder`]: marked set sorted by symbol
//! - [`DependencyReport`]: optional record of every traversed edge
//!
//! # Example
//!
//! ```ignore
//! let types = TypeSystem::new();
//! let factory = NodeFactory::new(&types);
//! let ctx = CompilationContext::new(&factory, &NoBodyDependencies);
//!
//! let root = factory.helper(HelperId::VirtualCall, to_string)?;
//! let output = analyze(ctx, &[root], AnalysisConfig::default())?;
//! for (symbol, node) in output.order.iter() {
//!     backend.emit(symbol, node.key());
//! }
//! ```

mod analysis;
mod config;
mod context;
mod emission;
mod error;
mod factory;
pub mod mangle;
mod marked_set;
mod marker;
mod node;
mod report;
mod rules;

#[cfg(test)]
mod test_helpers;

pub use analysis::{analyze, AnalysisOutput};
pub use config::AnalysisConfig;
pub use context::{CompilationContext, MethodBodyScanner, NoBodyDependencies};
pub use emission::EmissionOrder;
pub use error::DependencyError;
pub use factory::NodeFactory;
pub use mangle::Mangler;
pub use marked_set::{MarkReason, MarkStep, MarkedSet};
pub use marker::{MarkOutcome, Marker};
pub use node::{
    DependencyEdge, DependencyList, HelperId, HelperTarget, Node, NodeKey, NodeKind, NodeRef,
    TargetShape,
};
pub use report::{DependencyReport, ReportLine};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=nacre_depgraph=debug` or `RUST_LOG=nacre_depgraph=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
