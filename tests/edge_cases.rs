use bson::spec::BinarySubtype;
use bson::{Binary, Bson, Document, Uuid, doc};
use fieldseal::{
    CompileError, ElementType, EncryptedBinDataType, EnvelopeHeader, FieldSpec, Validator,
    ValidatorBuilder, compile, evaluate,
};

fn key() -> Uuid {
    Uuid::parse_str("deadbeef-0000-0000-0000-0000deadbeef").unwrap()
}

fn spec(path: &str, type_alias: &str) -> FieldSpec {
    FieldSpec::parse(key(), path, type_alias).unwrap()
}

fn envelope(ty: ElementType) -> Bson {
    EnvelopeHeader::new(EncryptedBinDataType::Fle2EqualityIndexedValue, key(), ty)
        .into_bson(b"opaque ciphertext")
}

fn legacy_envelope(ty: ElementType) -> Bson {
    EnvelopeHeader::new(EncryptedBinDataType::Deterministic, key(), ty).into_bson(b"legacy")
}

/// `a.b.c: string`, `a.b.d: int`, `c: array`, `a.x.y: bool`.
fn nested_validator() -> Validator {
    ValidatorBuilder::new()
        .field(spec("a.b.c", "string"))
        .field(spec("a.b.d", "int"))
        .field(spec("c", "array"))
        .field(spec("a.x.y", "bool"))
        .compile()
        .unwrap()
}

#[test]
fn empty_spec_list_accepts_any_document() {
    let expr = compile(&[]).unwrap();
    for doc in [
        doc! {},
        doc! { "a": [1, 2, 3] },
        doc! { "a": { "b": { "c": "plaintext" } } },
        doc! { "c": null },
    ] {
        assert!(evaluate(&expr, &doc), "{doc}");
    }
}

#[test]
fn matches_when_no_encrypted_fields_present() {
    let v = nested_validator();
    assert!(v.evaluate(&doc! {}));
    assert!(v.evaluate(&doc! { "name": "sue" }));
}

#[test]
fn matches_when_only_prefixes_present() {
    let v = nested_validator();
    assert!(v.evaluate(&doc! { "a": {} }));
    assert!(v.evaluate(&doc! { "a": { "b": {}, "x": { "count": 23 } } }));
}

#[test]
fn scalars_along_path_are_tolerated() {
    let v = nested_validator();
    assert!(v.evaluate(&doc! { "a": 1 }));
    assert!(v.evaluate(&doc! { "a": { "b": 2, "x": "foo" } }));
}

#[test]
fn matches_with_some_encrypted_fields() {
    let v = nested_validator();
    assert!(v.evaluate(&doc! { "c": envelope(ElementType::Array), "other": "foo" }));
    assert!(v.evaluate(&doc! { "a": { "b": { "c": envelope(ElementType::String) } } }));
}

#[test]
fn matches_with_all_encrypted_fields() {
    let v = nested_validator();
    let all_in = doc! {
        "c": envelope(ElementType::Array),
        "a": {
            "b": {
                "c": envelope(ElementType::String),
                "d": envelope(ElementType::Int32),
            },
            "x": { "y": envelope(ElementType::Boolean) },
        },
    };
    assert!(v.evaluate(&all_in));
}

#[test]
fn rejects_plaintext_at_encrypted_field() {
    let v = nested_validator();
    assert!(!v.evaluate(&doc! { "a": { "b": { "c": "foo" } } }));
    assert!(!v.evaluate(&doc! { "c": [] }));
    assert!(!v.evaluate(&doc! { "a": { "x": { "y": [1, 2, 3] } } }));
    assert!(!v.evaluate(&doc! { "a": { "b": { "d": 42 } } }));
    let generic = Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![],
    });
    assert!(!v.evaluate(&doc! { "c": generic }));
}

#[test]
fn rejects_legacy_scheme() {
    let v = nested_validator();
    assert!(!v.evaluate(&doc! { "c": legacy_envelope(ElementType::Array) }));
    assert!(!v.evaluate(&doc! { "a": { "b": { "c": legacy_envelope(ElementType::String) } } }));
}

#[test]
fn rejects_type_mismatch() {
    let v = nested_validator();
    assert!(!v.evaluate(&doc! { "c": envelope(ElementType::String) }));
    assert!(!v.evaluate(&doc! { "a": [ { "b": { "c": envelope(ElementType::Boolean) } } ] }));
}

#[test]
fn rejects_arrays_along_path() {
    let v = nested_validator();
    assert!(!v.evaluate(&doc! { "a": [] }));
    assert!(!v.evaluate(&doc! { "a": { "b": [1, 2, 3] } }));
    assert!(!v.evaluate(&doc! { "a": [ { "b": { "c": envelope(ElementType::String) } } ] }));
}

#[test]
fn one_failing_leaf_fails_whole_document() {
    let v = nested_validator();
    let mut good = doc! {
        "a": {
            "b": {
                "c": envelope(ElementType::String),
                "d": envelope(ElementType::Int32),
            },
            "x": { "y": envelope(ElementType::Boolean) },
        },
    };
    assert!(v.evaluate(&good));

    if let Some(Bson::Document(a)) = good.get_mut("a") {
        if let Some(Bson::Document(x)) = a.get_mut("x") {
            x.insert("y", envelope(ElementType::String));
        }
    }
    assert!(!v.evaluate(&good));
}

#[test]
fn end_to_end_array_typed_field() {
    let v = ValidatorBuilder::new()
        .field(spec("c", "array"))
        .compile()
        .unwrap();
    assert!(v.evaluate(&doc! { "c": envelope(ElementType::Array) }));
    assert!(!v.evaluate(&doc! { "c": envelope(ElementType::String) }));
    assert!(v.evaluate(&doc! {}));
    assert!(!v.evaluate(&doc! { "c": [] }));
}

#[test]
fn disjoint_specs_behave_like_conjunction() {
    let a = compile(&[spec("a.p", "string")]).unwrap();
    let b = compile(&[spec("b.q", "int")]).unwrap();
    let both = compile(&[spec("a.p", "string"), spec("b.q", "int")]).unwrap();

    let a_values = [
        None,
        Some(Bson::Document(doc! { "p": envelope(ElementType::String) })),
        Some(Bson::Document(doc! { "p": "plain" })),
        Some(Bson::Array(vec![])),
    ];
    let b_values = [
        None,
        Some(Bson::Document(doc! { "q": envelope(ElementType::Int32) })),
        Some(Bson::Document(doc! { "q": envelope(ElementType::String) })),
        Some(Bson::Int32(3)),
    ];
    for av in &a_values {
        for bv in &b_values {
            let mut doc = Document::new();
            if let Some(v) = av {
                doc.insert("a", v.clone());
            }
            if let Some(v) = bv {
                doc.insert("b", v.clone());
            }
            assert_eq!(
                evaluate(&both, &doc),
                evaluate(&a, &doc) && evaluate(&b, &doc),
                "{doc}"
            );
        }
    }
}

#[test]
fn conflicts_name_both_paths() {
    let cases = [
        (vec!["a", "a.b"], ("a", "a.b")),
        (vec!["a.b.c", "a.b"], ("a.b.c", "a.b")),
        (vec!["a.b.c", "a.b.c"], ("a.b.c", "a.b.c")),
    ];
    for (paths, (existing, conflicting)) in cases {
        let specs: Vec<FieldSpec> = paths.iter().map(|p| spec(p, "string")).collect();
        match compile(&specs) {
            Err(CompileError::PathConflict {
                existing: e,
                conflicting: c,
            }) => {
                assert_eq!(e.to_string(), existing);
                assert_eq!(c.to_string(), conflicting);
            }
            Ok(_) => panic!("expected conflict for {paths:?}"),
        }
    }
}

#[test]
fn truncated_envelope_is_false_not_panic() {
    let v = ValidatorBuilder::new()
        .field(spec("s", "string"))
        .compile()
        .unwrap();
    for len in 0..18 {
        let value = Bson::Binary(Binary {
            subtype: BinarySubtype::Encrypted,
            bytes: vec![7; len],
        });
        assert!(!v.evaluate(&doc! { "s": value }));
    }
}

#[test]
fn null_at_encrypted_field_is_rejected() {
    let v = ValidatorBuilder::new()
        .field(spec("s", "null"))
        .compile()
        .unwrap();
    assert!(!v.evaluate(&doc! { "s": null }));
    assert!(v.evaluate(&doc! { "s": envelope(ElementType::Null) }));
}

#[test]
fn deep_path_checks_every_level_for_arrays() {
    let v = ValidatorBuilder::new()
        .field(spec("l1.l2.l3.l4.leaf", "long"))
        .compile()
        .unwrap();
    assert!(v.evaluate(&doc! { "l1": { "l2": { "l3": { "l4": { "leaf": envelope(ElementType::Int64) } } } } }));
    assert!(!v.evaluate(&doc! { "l1": { "l2": { "l3": [ { "l4": {} } ] } } }));
    assert!(v.evaluate(&doc! { "l1": { "l2": { "l3": "stop" } } }));
}
