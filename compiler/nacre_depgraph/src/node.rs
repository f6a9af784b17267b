//! The dependency-graph node model.
//!
//! A node is identified by its [`NodeKey`]: a kind plus the descriptor it
//! targets. Nodes are only ever created by the
//! [`NodeFactory`](crate::NodeFactory), which guarantees one [`Node`] per key.
//!
//! Each node owns two memo cells:
//!
//! - its mangled name, filled on first request;
//! - its dependency list, computed exactly once under a per-node lock.
//!
//! Dependency edges name their targets by key rather than by reference, so
//! cycles in the graph never become reference-count cycles and the whole
//! graph is freed with the factory.

use std::fmt;
use std::sync::{Arc, OnceLock};

use nacre_typesys::{DelegateInfo, MethodDesc, TypeDesc};
use parking_lot::Mutex;

use crate::context::CompilationContext;
use crate::error::DependencyError;
use crate::mangle::Mangler;
use crate::rules;

/// Runtime helper stubs the compiler can request.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum HelperId {
    /// Allocate an instance of a type.
    NewHelper,
    /// Allocate a single-dimensional array.
    NewArr1,
    /// Dispatch a virtual call.
    VirtualCall,
    /// `isinst` type check.
    IsInstanceOf,
    /// `castclass` type check.
    CastClass,
    /// Base address of a type's non-GC statics.
    GetNonGCStaticBase,
    /// Base address of a type's GC statics.
    GetGCStaticBase,
    /// Base address of a type's thread statics.
    GetThreadStaticBase,
    /// Construct a delegate over a target method.
    DelegateCtor,
}

impl HelperId {
    pub const ALL: [HelperId; 9] = [
        HelperId::NewHelper,
        HelperId::NewArr1,
        HelperId::VirtualCall,
        HelperId::IsInstanceOf,
        HelperId::CastClass,
        HelperId::GetNonGCStaticBase,
        HelperId::GetGCStaticBase,
        HelperId::GetThreadStaticBase,
        HelperId::DelegateCtor,
    ];

    /// The target shape this helper is parameterized over.
    pub const fn target_shape(self) -> TargetShape {
        match self {
            HelperId::VirtualCall => TargetShape::Method,
            HelperId::DelegateCtor => TargetShape::Delegate,
            HelperId::NewHelper
            | HelperId::NewArr1
            | HelperId::IsInstanceOf
            | HelperId::CastClass
            | HelperId::GetNonGCStaticBase
            | HelperId::GetGCStaticBase
            | HelperId::GetThreadStaticBase => TargetShape::Type,
        }
    }

    /// Symbol prefix for this helper's stubs.
    pub const fn symbol_prefix(self) -> &'static str {
        match self {
            HelperId::NewHelper => "__NewHelper_",
            HelperId::NewArr1 => "__NewArr1_",
            HelperId::VirtualCall => "__VirtualCall_",
            HelperId::IsInstanceOf => "__IsInstanceOf_",
            HelperId::CastClass => "__CastClass_",
            HelperId::GetNonGCStaticBase => "__GetNonGCStaticBase_",
            HelperId::GetGCStaticBase => "__GetGCStaticBase_",
            HelperId::GetThreadStaticBase => "__GetThreadStaticBase_",
            HelperId::DelegateCtor => "__DelegateCtor_",
        }
    }
}

/// Shape of a helper's target payload.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetShape {
    Type,
    Method,
    Delegate,
}

impl fmt::Display for TargetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetShape::Type => "type descriptor",
            TargetShape::Method => "method descriptor",
            TargetShape::Delegate => "delegate record",
        })
    }
}

/// Target payload of a helper node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HelperTarget {
    Type(TypeDesc),
    Method(MethodDesc),
    Delegate(DelegateInfo),
}

impl HelperTarget {
    pub const fn shape(self) -> TargetShape {
        match self {
            HelperTarget::Type(_) => TargetShape::Type,
            HelperTarget::Method(_) => TargetShape::Method,
            HelperTarget::Delegate(_) => TargetShape::Delegate,
        }
    }
}

impl From<TypeDesc> for HelperTarget {
    fn from(ty: TypeDesc) -> Self {
        HelperTarget::Type(ty)
    }
}

impl From<MethodDesc> for HelperTarget {
    fn from(method: MethodDesc) -> Self {
        HelperTarget::Method(method)
    }
}

impl From<DelegateInfo> for HelperTarget {
    fn from(info: DelegateInfo) -> Self {
        HelperTarget::Delegate(info)
    }
}

/// Kind of a node, without its payload.
///
/// The derived order is the emission tiebreak.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum NodeKind {
    Helper(HelperId),
    /// "This virtual method is called somewhere."
    VirtualMethodUse,
    /// A method's compiled body.
    MethodEntry,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Helper(id) => write!(f, "{id:?}"),
            NodeKind::VirtualMethodUse => f.write_str("VirtualMethodUse"),
            NodeKind::MethodEntry => f.write_str("MethodEntry"),
        }
    }
}

/// Identity of a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKey {
    Helper { id: HelperId, target: HelperTarget },
    VirtualMethodUse(MethodDesc),
    MethodEntry(MethodDesc),
}

impl NodeKey {
    pub fn helper(id: HelperId, target: impl Into<HelperTarget>) -> Self {
        NodeKey::Helper {
            id,
            target: target.into(),
        }
    }

    pub const fn kind(&self) -> NodeKind {
        match self {
            NodeKey::Helper { id, .. } => NodeKind::Helper(*id),
            NodeKey::VirtualMethodUse(_) => NodeKind::VirtualMethodUse,
            NodeKey::MethodEntry(_) => NodeKind::MethodEntry,
        }
    }

    /// Reject helper keys whose payload does not match the helper.
    pub fn check_shape(&self) -> Result<(), DependencyError> {
        match self {
            NodeKey::Helper { id, target } if id.target_shape() != target.shape() => {
                Err(DependencyError::TargetMismatch {
                    kind: self.kind(),
                    expected: id.target_shape(),
                    found: target.shape(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Shared handle to an interned node.
pub type NodeRef = Arc<Node>;

/// One outgoing edge of a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DependencyEdge {
    pub target: NodeKey,
    /// Why the edge exists; diagnostics only.
    pub reason: &'static str,
}

/// Dependency requests gathered while computing a node's edges.
///
/// Requests are keys, not nodes: the rule engine interns each one through
/// the factory, so nothing outside the factory ever constructs a node.
#[derive(Debug, Default)]
pub struct DependencyList {
    requests: Vec<(NodeKey, &'static str)>,
}

impl DependencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: NodeKey, reason: &'static str) {
        self.requests.push((key, reason));
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub(crate) fn into_requests(self) -> Vec<(NodeKey, &'static str)> {
        self.requests
    }
}

/// An interned unit of compiler output.
pub struct Node {
    key: NodeKey,
    name: OnceLock<String>,
    dependencies: Mutex<Option<Arc<[DependencyEdge]>>>,
}

impl Node {
    pub(crate) fn new(key: NodeKey) -> Self {
        Node {
            key,
            name: OnceLock::new(),
            dependencies: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn kind(&self) -> NodeKind {
        self.key.kind()
    }

    /// The node's symbol name.
    ///
    /// Naming is pure, so two threads racing here compute the same string and
    /// one copy is dropped.
    pub fn mangled_name(&self, mangler: &Mangler<'_>) -> Result<&str, DependencyError> {
        if let Some(name) = self.name.get() {
            return Ok(name.as_str());
        }
        let name = mangler.mangle_node(&self.key)?;
        Ok(self.name.get_or_init(|| name).as_str())
    }

    /// The name, if it has already been computed.
    pub fn cached_name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    /// The node's outgoing edges, computed on first call.
    ///
    /// Concurrent callers block on the node's lock; the rule runs once and
    /// every caller shares the published list. A failed computation leaves
    /// the cell empty.
    pub fn dependencies(
        &self,
        ctx: &CompilationContext<'_>,
    ) -> Result<Arc<[DependencyEdge]>, DependencyError> {
        let mut memo = self.dependencies.lock();
        if let Some(edges) = memo.as_ref() {
            return Ok(Arc::clone(edges));
        }
        let edges: Arc<[DependencyEdge]> = rules::compute_dependencies(&self.key, ctx)?.into();
        *memo = Some(Arc::clone(&edges));
        Ok(edges)
    }

    pub fn dependencies_computed(&self) -> bool {
        self.dependencies.lock().is_some()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("name", &self.name.get())
            .finish_non_exhaustive()
    }
}
