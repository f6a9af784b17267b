//! The collaborators a dependency rule may consult.

use nacre_typesys::{MethodDesc, TypeSystem};

use crate::factory::NodeFactory;
use crate::mangle::Mangler;
use crate::node::DependencyList;

/// Reports what a compiled method body references.
///
/// Implemented by the code generator: after compiling `method` it knows every
/// helper, callee, and metadata blob the body needs. The engine never looks
/// inside a method itself.
pub trait MethodBodyScanner: Sync {
    fn scan(&self, method: MethodDesc, deps: &mut DependencyList);
}

/// Scanner for which every method body is a leaf.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBodyDependencies;

impl MethodBodyScanner for NoBodyDependencies {
    fn scan(&self, _method: MethodDesc, _deps: &mut DependencyList) {}
}

/// Everything shared by one compilation's dependency analysis.
///
/// Constructed by the driver and passed by reference; there is no global
/// instance, so independent compilations can run side by side.
#[derive(Clone, Copy)]
pub struct CompilationContext<'a> {
    factory: &'a NodeFactory<'a>,
    scanner: &'a dyn MethodBodyScanner,
}

impl<'a> CompilationContext<'a> {
    pub fn new(factory: &'a NodeFactory<'a>, scanner: &'a dyn MethodBodyScanner) -> Self {
        CompilationContext { factory, scanner }
    }

    pub fn factory(&self) -> &'a NodeFactory<'a> {
        self.factory
    }

    pub fn types(&self) -> &'a TypeSystem {
        self.factory.types()
    }

    pub fn scanner(&self) -> &'a dyn MethodBodyScanner {
        self.scanner
    }

    pub fn mangler(&self) -> Mangler<'a> {
        Mangler::new(self.types())
    }
}
