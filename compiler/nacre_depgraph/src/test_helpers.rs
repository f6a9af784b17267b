//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::sync::atomic::{AtomicUsize, Ordering};

use nacre_typesys::{MethodDesc, MethodFlags, MethodSignature, TypeDesc, TypeSystem};
use rustc_hash::FxHashMap;

use crate::context::MethodBodyScanner;
use crate::node::{DependencyList, NodeKey};

/// A handful of core-library descriptors.
pub(crate) struct Corlib {
    pub object: TypeDesc,
    pub string: TypeDesc,
    pub int32: TypeDesc,
    /// `virtual string Object.ToString()`
    pub to_string: MethodDesc,
    /// `abstract int IComparable.CompareTo(object)`
    pub compare_to: MethodDesc,
    /// `static void Program.Main()`
    pub main: MethodDesc,
    /// `static int Program.Helper(int)`
    pub helper: MethodDesc,
    /// `static int Program.Helper(string)`
    pub helper_str: MethodDesc,
}

pub(crate) fn corlib(types: &TypeSystem) -> Corlib {
    let object = types.named("System", "Object").unwrap();
    let string = types.named("System", "String").unwrap();
    let int32 = types.named("System", "Int32").unwrap();
    let comparable = types.named("System", "IComparable").unwrap();
    let program = types.named("App", "Program").unwrap();

    let to_string = types
        .method(
            object,
            "ToString",
            MethodSignature::new(vec![], Some(string)),
            MethodFlags::VIRTUAL,
        )
        .unwrap();
    let compare_to = types
        .method(
            comparable,
            "CompareTo",
            MethodSignature::new(vec![object], Some(int32)),
            MethodFlags::VIRTUAL | MethodFlags::ABSTRACT,
        )
        .unwrap();
    let main = types
        .method(
            program,
            "Main",
            MethodSignature::default(),
            MethodFlags::STATIC,
        )
        .unwrap();
    let helper = types
        .method(
            program,
            "Helper",
            MethodSignature::new(vec![int32], Some(int32)),
            MethodFlags::STATIC,
        )
        .unwrap();
    let helper_str = types
        .method(
            program,
            "Helper",
            MethodSignature::new(vec![string], Some(int32)),
            MethodFlags::STATIC,
        )
        .unwrap();

    Corlib {
        object,
        string,
        int32,
        to_string,
        compare_to,
        main,
        helper,
        helper_str,
    }
}

/// Scanner with scripted method bodies that counts how often it runs.
#[derive(Default)]
pub(crate) struct ScriptedScanner {
    bodies: FxHashMap<MethodDesc, Vec<(NodeKey, &'static str)>>,
    scans: AtomicUsize,
}

impl ScriptedScanner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, method: MethodDesc, deps: Vec<(NodeKey, &'static str)>) -> Self {
        self.bodies.insert(method, deps);
        self
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }
}

impl MethodBodyScanner for ScriptedScanner {
    fn scan(&self, method: MethodDesc, deps: &mut DependencyList) {
        self.scans.fetch_add(1, Ordering::SeqCst);
        if let Some(body) = self.bodies.get(&method) {
            for &(key, reason) in body {
                deps.add(key, reason);
            }
        }
    }
}
