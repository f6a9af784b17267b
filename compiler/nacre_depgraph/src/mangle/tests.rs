#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use nacre_typesys::{DelegateInfo, DelegateShape, MethodFlags, MethodSignature, TypeSystem};
use pretty_assertions::{assert_eq, assert_ne};
use proptest::prelude::*;

use crate::test_helpers::corlib;

use super::*;

fn encoded(name: &str) -> String {
    let mut out = String::new();
    encode_identifier(&mut out, name);
    out
}

#[test]
fn helper_over_type() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    assert_eq!(
        mangler
            .mangle_node(&NodeKey::helper(HelperId::NewHelper, lib.string))
            .unwrap(),
        "__NewHelper_System$$_String"
    );
    assert_eq!(
        mangler
            .mangle_node(&NodeKey::helper(HelperId::GetGCStaticBase, lib.int32))
            .unwrap(),
        "__GetGCStaticBase_System$$_Int32"
    );
}

#[test]
fn helper_over_method() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    assert_eq!(
        mangler
            .mangle_node(&NodeKey::helper(HelperId::VirtualCall, lib.to_string))
            .unwrap(),
        "__VirtualCall_System$$_Object$$FToString$$S$$VSystem$$_String$$E"
    );
}

#[test]
fn method_nodes_use_their_prefixes() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    assert_eq!(
        mangler.mangle_node(&NodeKey::MethodEntry(lib.main)).unwrap(),
        "_nac_App$$_Program$$FMain$$S$$V$$E"
    );
    assert_eq!(
        mangler
            .mangle_node(&NodeKey::VirtualMethodUse(lib.compare_to))
            .unwrap(),
        "__VirtualMethodUse_System$$_IComparable$$FCompareTo$$SSystem$$_Object$$VSystem$$_Int32$$E"
    );
}

#[test]
fn overloads_get_distinct_names() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    assert_ne!(
        mangler.mangle_method(lib.helper).unwrap(),
        mangler.mangle_method(lib.helper_str).unwrap()
    );
}

#[test]
fn delegate_shapes_get_distinct_names() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    let names: Vec<String> = [
        DelegateShape::ClosedInstance,
        DelegateShape::ClosedStatic,
        DelegateShape::OpenStatic,
        DelegateShape::OpenInstance,
    ]
    .into_iter()
    .map(|shape| {
        let key = NodeKey::helper(HelperId::DelegateCtor, DelegateInfo::new(lib.helper, shape));
        mangler.mangle_node(&key).unwrap()
    })
    .collect();

    assert!(names[2].ends_with("$$DOS"));
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn generic_instantiations_are_distinct() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    let list_int = types
        .generic("System.Collections.Generic", "List`1", &[lib.int32])
        .unwrap();
    let list_str = types
        .generic("System.Collections.Generic", "List`1", &[lib.string])
        .unwrap();

    assert_eq!(
        mangler.mangle_type(list_int).unwrap(),
        "System$$_Collections$$_Generic$$_List$BT1$$GSystem$$_Int32$$E"
    );
    assert_ne!(
        mangler.mangle_type(list_int).unwrap(),
        mangler.mangle_type(list_str).unwrap()
    );
}

#[test]
fn constructed_types() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    let sz = types.sz_array(lib.int32).unwrap();
    let rank1 = types.array(lib.int32, 1).unwrap();
    let rank2 = types.array(lib.int32, 2).unwrap();
    let ptr = types.pointer(lib.int32).unwrap();
    let by_ref = types.by_ref(lib.int32).unwrap();

    assert_eq!(mangler.mangle_type(sz).unwrap(), "System$$_Int32$$Z");
    assert_eq!(mangler.mangle_type(rank1).unwrap(), "System$$_Int32$$A1");
    assert_eq!(mangler.mangle_type(rank2).unwrap(), "System$$_Int32$$A2");
    assert_eq!(mangler.mangle_type(ptr).unwrap(), "System$$_Int32$$P");
    assert_eq!(mangler.mangle_type(by_ref).unwrap(), "System$$_Int32$$R");
}

#[test]
fn generic_parameters_in_signatures() {
    let types = TypeSystem::new();
    let lib = corlib(&types);
    let mangler = Mangler::new(&types);

    let t0 = types.type_param(0).unwrap();
    let m0 = types.method_param(0).unwrap();
    let a = types
        .method(
            lib.object,
            "Id",
            MethodSignature::new(vec![t0], Some(t0)),
            MethodFlags::STATIC,
        )
        .unwrap();
    let b = types
        .method(
            lib.object,
            "Id",
            MethodSignature::new(vec![m0], Some(m0)),
            MethodFlags::STATIC,
        )
        .unwrap();

    assert_eq!(
        mangler.mangle_method(a).unwrap(),
        "System$$_Object$$FId$$S$$T0$$V$$T0$$E"
    );
    assert_ne!(
        mangler.mangle_method(a).unwrap(),
        mangler.mangle_method(b).unwrap()
    );
}

#[test]
fn global_namespace_and_empty_segments() {
    let types = TypeSystem::new();
    let mangler = Mangler::new(&types);

    let global = types.named("", "Module").unwrap();
    let dotted = types.named("A.B", "C").unwrap();
    let doubled = types.named("A..B", "C").unwrap();

    assert_eq!(mangler.mangle_type(global).unwrap(), "Module");
    assert_eq!(mangler.mangle_type(dotted).unwrap(), "A$$_B$$_C");
    assert_ne!(
        mangler.mangle_type(dotted).unwrap(),
        mangler.mangle_type(doubled).unwrap()
    );
}

#[test]
fn identifier_escapes() {
    assert_eq!(encoded("plain_Name1"), "plain_Name1");
    assert_eq!(encoded("<Main>b__0"), "$LTMain$GTb__0");
    assert_eq!(encoded("a.b"), "a$DTb");
    assert_eq!(encoded("x@y"), "x$40y");
    assert_eq!(encoded("$"), "$24");
    assert_eq!(encoded("é"), "$e9");
    assert_eq!(encoded("λ"), "$U0003bb");
}

#[test]
fn recognizes_own_symbols() {
    assert!(is_nacre_symbol("_nac_App$$_Program$$FMain$$S$$V$$E"));
    assert!(is_nacre_symbol("__VirtualMethodUse_X$$FY$$S$$V$$E"));
    assert!(is_nacre_symbol("__CastClass_System$$_String"));
    assert!(!is_nacre_symbol("main"));
    assert!(!is_nacre_symbol("_ZN4core3fmt"));
}

#[test]
fn unknown_descriptor_fails() {
    let types = TypeSystem::new();
    let mangler = Mangler::new(&types);

    assert!(matches!(
        mangler.mangle_type(TypeDesc::from_raw(3)),
        Err(DependencyError::UnknownDescriptor { .. })
    ));
}

proptest! {
    #[test]
    fn encoded_identifiers_never_contain_marker(name in "\\PC{0,16}") {
        let out = encoded(&name);
        prop_assert!(!out.contains("$$"));
        prop_assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'));
    }

    #[test]
    fn distinct_identifiers_encode_distinctly(a in "\\PC{0,8}", b in "\\PC{0,8}") {
        prop_assume!(a != b);
        prop_assert_ne!(encoded(&a), encoded(&b));
    }
}
