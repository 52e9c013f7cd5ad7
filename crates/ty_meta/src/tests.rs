use crate::{RegistryError, TypeInfo, TypeKind, TypeRegistry, TypeRegistryBuilder};

fn names(reg: &TypeRegistry, ids: &[crate::TypeId]) -> Vec<String> {
    ids.iter().map(|&id| reg[id].name.to_string()).collect()
}

#[test]
fn instance_arity_is_checked() {
    let mut b = TypeRegistryBuilder::new();
    let seq = b.define_generic("Seq", 1);
    let int = b.add(TypeInfo::opaque("int")).unwrap();

    let err = b.add_instance(seq, [int, int]).unwrap_err();
    assert_eq!(
        err,
        RegistryError::ArityMismatch {
            def: "Seq".into(),
            expected: 1,
            got: 2,
        }
    );
}

#[test]
fn duplicate_instances_are_rejected() {
    let mut b = TypeRegistryBuilder::new();
    let seq = b.define_generic("Seq", 1);
    let int = b.add(TypeInfo::opaque("int")).unwrap();

    b.add_instance(seq, [int]).unwrap();
    let err = b.add_instance(seq, [int]).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateInstance("Seq<int>".into()));
}

#[test]
fn array_shapes_are_validated() {
    let mut b = TypeRegistryBuilder::new();
    let int = b.add(TypeInfo::opaque("int")).unwrap();

    assert_eq!(
        b.add_array(int, 2, true).unwrap_err(),
        RegistryError::InvalidArrayShape {
            rank: 2,
            jagged: true,
        }
    );
    assert_eq!(
        b.add_array(int, 0, false).unwrap_err(),
        RegistryError::InvalidArrayShape {
            rank: 0,
            jagged: false,
        }
    );

    b.add_array(int, 1, true).unwrap();
    assert_eq!(
        b.add_array(int, 1, true).unwrap_err(),
        RegistryError::DuplicateArray("int[]".into())
    );
}

#[test]
fn generated_names_follow_shape() {
    let mut b = TypeRegistryBuilder::new();
    let pair = b.define_generic("Pair", 2);
    let int = b.add(TypeInfo::opaque("int")).unwrap();
    let text = b.add(TypeInfo::opaque("text")).unwrap();

    let pair_int_text = b.add_instance(pair, [int, text]).unwrap();
    let vec_int = b.add_array(int, 1, true).unwrap();
    let block_int = b.add_array(int, 1, false).unwrap();
    let grid_int = b.add_array(int, 3, false).unwrap();

    let reg = b.finish();
    assert_eq!(reg[pair_int_text].name, "Pair<int, text>");
    assert_eq!(reg[vec_int].name, "int[]");
    assert_eq!(reg[block_int].name, "int[*]");
    assert_eq!(reg[grid_int].name, "int[,,]");
}

#[test]
fn lookup_round_trips() {
    let mut b = TypeRegistryBuilder::new();
    let seq = b.define_generic("Seq", 1);
    let int = b.add(TypeInfo::opaque("int")).unwrap();
    let seq_int = b.add_instance(seq, [int]).unwrap();
    let vec_int = b.add_array(int, 1, true).unwrap();

    let reg = b.finish();
    assert_eq!(reg.lookup_instance(seq, &[int]), Some(seq_int));
    assert_eq!(reg.lookup_array(int, 1, true), Some(vec_int));
    assert_eq!(reg.lookup_array(int, 2, false), None);
}

#[test]
fn supertypes_walk_the_base_chain() {
    let mut b = TypeRegistryBuilder::new();
    let root = b.add(TypeInfo::opaque("value")).unwrap();
    let shape = b.add(TypeInfo::opaque("shape").with_base(root)).unwrap();
    let circle = b.add(TypeInfo::opaque("circle").with_base(shape)).unwrap();

    let reg = b.finish();
    assert_eq!(
        names(&reg, &reg.supertypes(circle).collect::<Vec<_>>()),
        ["circle", "shape", "value"]
    );
}

#[test]
fn interfaces_are_collected_transitively() {
    let mut b = TypeRegistryBuilder::new();
    let seq = b.define_generic("Seq", 1);
    let source = b.define_generic("Source", 1);
    let int = b.add(TypeInfo::opaque("int")).unwrap();

    // Seq<int> itself implements Source<int>.
    let source_int = b.add_instance(source, [int]).unwrap();
    let seq_int = b.add_instance(seq, [int]).unwrap();
    b.add_iface(seq_int, source_int);

    // `stream` implements Seq<int> through its base type.
    let reader = b.add(TypeInfo::opaque("reader").with_iface(seq_int)).unwrap();
    let stream = b.add(TypeInfo::opaque("stream").with_base(reader)).unwrap();

    let reg = b.finish();
    let mut ifaces = names(&reg, &reg.all_ifaces(stream));
    ifaces.sort();
    assert_eq!(ifaces, ["Seq<int>", "Source<int>"]);

    assert!(reg.is_assignable(stream, source_int));
    assert!(reg.is_assignable(stream, reader));
    assert!(!reg.is_assignable(reader, stream));
}

#[test]
fn implementations_are_deduplicated() {
    let mut b = TypeRegistryBuilder::new();
    let seq = b.define_generic("Seq", 1);
    let int = b.add(TypeInfo::opaque("int")).unwrap();
    let seq_int = b.add_instance(seq, [int]).unwrap();

    // Both the type and its base implement Seq<int>; one closed form.
    let reader = b.add(TypeInfo::opaque("reader").with_iface(seq_int)).unwrap();
    let stream = b
        .add(TypeInfo::opaque("stream").with_base(reader).with_iface(seq_int))
        .unwrap();

    let reg = b.finish();
    let impls = reg.implementations_of(stream, seq);
    assert_eq!(impls.len(), 1);
    assert_eq!(impls[0].0, seq_int);
    assert_eq!(impls[0].1, &[int]);
}

#[test]
fn closed_forms_include_the_type_itself() {
    let mut b = TypeRegistryBuilder::new();
    let seq = b.define_generic("Seq", 1);
    let list = b.define_generic("List", 1);
    let int = b.add(TypeInfo::opaque("int")).unwrap();
    let seq_int = b.add_instance(seq, [int]).unwrap();
    let list_int = b.add_instance(list, [int]).unwrap();
    b.add_iface(list_int, seq_int);

    let reg = b.finish();
    assert_eq!(
        reg.implementations_of(list_int, list),
        [(list_int, &[int][..])]
    );
    assert_eq!(
        reg.implementations_of(list_int, seq),
        [(seq_int, &[int][..])]
    );
    assert!(reg.implementations_of(int, seq).is_empty());
}

#[test]
fn type_kind_is_preserved() {
    let mut b = TypeRegistryBuilder::new();
    let int = b.add(TypeInfo::opaque("int").constructible()).unwrap();
    let grid = b.add_array(int, 2, false).unwrap();

    let reg = b.finish();
    assert!(reg[int].constructible);
    assert!(!reg[grid].constructible);
    assert_eq!(
        reg[grid].kind,
        TypeKind::Array {
            elem: int,
            rank: 2,
            jagged: false,
        }
    );
}
