//! Per-kind dependency rules.
//!
//! This is the only place the graph grows edges. Each arm states what a node
//! of that kind requires; the resulting requests are interned through the
//! factory before being published as the node's edges.

use nacre_typesys::MethodFlags;

use crate::context::CompilationContext;
use crate::error::DependencyError;
use crate::node::{
    DependencyEdge, DependencyList, HelperId, HelperTarget, NodeKey, NodeKind, TargetShape,
};

pub(crate) const REASON_VIRTUAL_CALL: &str = "ReadyToRun Virtual Method Call";
pub(crate) const REASON_DELEGATE_TARGET: &str = "Delegate target method";
pub(crate) const REASON_VIRTUAL_IMPL: &str = "Virtual method implementation";

/// Compute the outgoing edges of `key`. An empty vector means no edges.
pub(crate) fn compute_dependencies(
    key: &NodeKey,
    ctx: &CompilationContext<'_>,
) -> Result<Vec<DependencyEdge>, DependencyError> {
    let mut deps = DependencyList::new();

    match *key {
        NodeKey::Helper { id, target } => helper_dependencies(id, target, &mut deps)?,
        NodeKey::VirtualMethodUse(method) => {
            let flags = ctx
                .types()
                .method_flags(method)
                .ok_or_else(|| DependencyError::unknown_descriptor(method))?;
            // An abstract slot has no body to keep alive.
            if !flags.contains(MethodFlags::ABSTRACT) {
                deps.add(NodeKey::MethodEntry(method), REASON_VIRTUAL_IMPL);
            }
        }
        NodeKey::MethodEntry(method) => ctx.scanner().scan(method, &mut deps),
    }

    tracing::trace!(node = ?key, edges = deps.len(), "computed dependencies");
    intern_requests(deps, ctx)
}

fn helper_dependencies(
    id: HelperId,
    target: HelperTarget,
    deps: &mut DependencyList,
) -> Result<(), DependencyError> {
    match (id, target) {
        (HelperId::VirtualCall, HelperTarget::Method(method)) => {
            deps.add(NodeKey::VirtualMethodUse(method), REASON_VIRTUAL_CALL);
        }
        (HelperId::DelegateCtor, HelperTarget::Delegate(info)) => {
            deps.add(NodeKey::MethodEntry(info.target), REASON_DELEGATE_TARGET);
        }
        // Type-targeted helpers add nothing here: the type's own metadata
        // closure belongs to the type system's node family.
        (_, HelperTarget::Type(_)) if id.target_shape() == TargetShape::Type => {}
        (id, target) => {
            return Err(DependencyError::TargetMismatch {
                kind: NodeKind::Helper(id),
                expected: id.target_shape(),
                found: target.shape(),
            });
        }
    }
    Ok(())
}

fn intern_requests(
    deps: DependencyList,
    ctx: &CompilationContext<'_>,
) -> Result<Vec<DependencyEdge>, DependencyError> {
    let factory = ctx.factory();
    deps.into_requests()
        .into_iter()
        .map(|(target, reason)| {
            factory.get_or_create(target)?;
            Ok(DependencyEdge { target, reason })
        })
        .collect()
}
