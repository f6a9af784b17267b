#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn same_structure_same_handle() {
    let ts = TypeSystem::new();
    let a = ts.named("System", "String").unwrap();
    let b = ts.named("System", "String").unwrap();
    let c = ts.named("System", "Object").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(ts.type_count(), 2);
}

#[test]
fn instantiations_are_distinct() {
    let ts = TypeSystem::new();
    let int = ts.named("System", "Int32").unwrap();
    let string = ts.named("System", "String").unwrap();
    let list_int = ts.generic("System.Collections.Generic", "List`1", &[int]).unwrap();
    let list_str = ts
        .generic("System.Collections.Generic", "List`1", &[string])
        .unwrap();

    assert_ne!(list_int, list_str);
    assert_eq!(
        ts.type_data(list_int),
        Some(TypeData::Named {
            namespace: "System.Collections.Generic".to_owned(),
            name: "List`1".to_owned(),
            instantiation: vec![int],
        })
    );
}

#[test]
fn rejects_unknown_components() {
    let ts = TypeSystem::new();
    let bogus = TypeDesc::from_raw(7);

    assert_eq!(ts.sz_array(bogus), Err(TypeSystemError::UnknownType(bogus)));
    assert_eq!(
        ts.sz_array(TypeDesc::INVALID),
        Err(TypeSystemError::UnknownType(TypeDesc::INVALID))
    );
    assert_eq!(ts.type_count(), 0);
}

#[test]
fn rejects_malformed_descriptors() {
    let ts = TypeSystem::new();
    let int = ts.named("System", "Int32").unwrap();

    assert_eq!(ts.array(int, 0), Err(TypeSystemError::InvalidRank(0)));
    assert_eq!(ts.named("System", ""), Err(TypeSystemError::EmptyName));
    assert_eq!(
        ts.method(int, "", MethodSignature::default(), MethodFlags::empty()),
        Err(TypeSystemError::EmptyName)
    );
}

#[test]
fn methods_intern_and_expose_flags() {
    let ts = TypeSystem::new();
    let object = ts.named("System", "Object").unwrap();
    let string = ts.named("System", "String").unwrap();
    let sig = MethodSignature::new(vec![], Some(string));

    let to_string = ts
        .method(object, "ToString", sig.clone(), MethodFlags::VIRTUAL)
        .unwrap();
    let again = ts
        .method(object, "ToString", sig, MethodFlags::VIRTUAL)
        .unwrap();

    assert_eq!(to_string, again);
    assert!(ts.contains_method(to_string));
    assert!(!ts.contains_method(MethodDesc::INVALID));
    assert_eq!(ts.method_flags(to_string), Some(MethodFlags::VIRTUAL));
}

#[test]
fn method_with_unknown_return_type_is_rejected() {
    let ts = TypeSystem::new();
    let object = ts.named("System", "Object").unwrap();
    let bogus = TypeDesc::from_raw(99);

    let result = ts.method(
        object,
        "Get",
        MethodSignature::new(vec![], Some(bogus)),
        MethodFlags::empty(),
    );
    assert_eq!(result, Err(TypeSystemError::UnknownType(bogus)));
}

#[test]
fn concurrent_interning_agrees() {
    let ts = TypeSystem::new();
    let handles: Vec<TypeDesc> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| ts.named("System", "Int64").unwrap()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert!(handles.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(ts.type_count(), 1);
}
