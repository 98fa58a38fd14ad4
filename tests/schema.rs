//! Schema resolution, default values, and generic node kinds on a small hand-written schema.

use txrep::ast::{
    Definitions, Discriminant, EnumDef, FieldDef, Schema, SchemaError, StructDef, TypeSpec,
    UnionArm, UnionDef,
};
use txrep::transaction;
use txrep::value::{Scalar, XdrString};
use txrep::{Codec, NoAnnotations, ScanError, Value};

fn holder_definitions() -> Definitions {
    Definitions {
        enums: vec![EnumDef::new("Color", &[("RED", 0), ("GREEN", 1), ("BLUE", 2)])],
        structs: vec![StructDef::new(
            "Holder",
            vec![
                FieldDef::new("flag", TypeSpec::Bool),
                FieldDef::new("tags", TypeSpec::array(TypeSpec::UInt, 2)),
                FieldDef::new(
                    "deep",
                    TypeSpec::optional(TypeSpec::optional(TypeSpec::Int)),
                ),
                FieldDef::new("label", TypeSpec::String(8)),
                FieldDef::new("color", TypeSpec::enum_ref("Color")),
                FieldDef::new("choice", TypeSpec::union_ref("Choice")),
            ],
        )],
        unions: vec![UnionDef::new(
            "Choice",
            "v",
            Discriminant::Int,
            vec![
                UnionArm::values(&[0], None),
                UnionArm::values(&[1], Some(FieldDef::new("n", TypeSpec::Int))),
            ],
        )
        .with_default(Some(FieldDef::new("raw", TypeSpec::VarOpaque(4))))],
    }
}

fn holder_codec() -> (Codec, Value) {
    let schema = Schema::resolve(holder_definitions()).expect("resolve");
    let codec = Codec::new(schema);
    let root = codec
        .default_value(&TypeSpec::struct_ref("Holder"))
        .expect("default");
    (codec, root)
}

#[test]
fn test_transaction_schema_resolves() {
    let schema = transaction::schema().expect("schema");
    assert!(schema.get_union(transaction::ENVELOPE).is_some());
    assert!(schema.get_struct("TransactionV0").is_some());
    let body = schema.get_union("OperationBody").expect("body");
    assert!(body.has_arm(9));
    assert_eq!(body.arm(9), Some(None));
    assert!(!body.has_arm(42));
}

#[test]
fn test_default_holder_encoding() {
    let (codec, root) = holder_codec();
    let text = codec
        .encode(&root, &NoAnnotations)
        .into_result()
        .expect("encode");
    assert_eq!(
        text,
        "flag: false\ntags[0]: 0\ntags[1]: 0\ndeep._present: false\nlabel: \"\"\ncolor: RED\nchoice.v: 0\n"
    );
}

#[test]
fn test_nested_optionals() {
    let (codec, mut root) = holder_codec();
    codec
        .decode(
            "deep._present: true\ndeep._inner_present: true\ndeep: -4\n",
            &mut root,
            &mut NoAnnotations,
        )
        .expect("decode");
    let text = codec.encode(&root, &NoAnnotations).text;
    assert!(text.contains("deep._present: true\ndeep._inner_present: true\ndeep: -4\n"));

    let (codec, mut inferred) = holder_codec();
    codec
        .decode("deep: -4\n", &mut inferred, &mut NoAnnotations)
        .expect("decode");
    assert_eq!(inferred, root);

    let (codec, mut half) = holder_codec();
    codec
        .decode(
            "deep._present: true\ndeep._inner_present: false\n",
            &mut half,
            &mut NoAnnotations,
        )
        .expect("decode");
    let text = codec.encode(&half, &NoAnnotations).text;
    assert!(text.contains("deep._present: true\ndeep._inner_present: false\nlabel"));
}

#[test]
fn test_default_union_arm() {
    let (codec, mut root) = holder_codec();
    codec
        .decode("choice.v: 9\nchoice.raw: 0a0b\n", &mut root, &mut NoAnnotations)
        .expect("decode");
    let text = codec.encode(&root, &NoAnnotations).text;
    assert!(text.ends_with("choice.v: 9\nchoice.raw: 0a0b\n"));

    codec
        .decode("choice.v: 1\nchoice.n: -3\n", &mut root, &mut NoAnnotations)
        .expect("decode");
    assert_eq!(
        codec.get_field(&root, "choice.n"),
        Some(&Value::Scalar(Scalar::Int(-3)))
    );
    assert_eq!(codec.get_field(&root, "choice.raw"), None);
}

#[test]
fn test_generic_scalars() {
    let (codec, mut root) = holder_codec();
    let mut help = txrep::HelpFields::new();
    let err = codec
        .decode(
            "flag: yes\ntags[1]: 7\nlabel: \"abc\"\ncolor: BLUE\nchoice.v: 5\nchoice.raw: 0102030405\n",
            &mut root,
            &mut help,
        )
        .expect_err("bad flag, long raw");
    assert_eq!(err.len(), 2);
    assert_eq!(err.0[0].line, 1);
    assert!(matches!(err.0[0].error, ScanError::Parse(_)));
    assert_eq!(
        err.0[1].error,
        ScanError::Bound {
            field: "choice.raw".to_string(),
            size: 5,
            max: 4,
        }
    );
    assert!(help.contains("flag"));
    assert_eq!(
        codec.get_field(&root, "tags[1]"),
        Some(&Value::Scalar(Scalar::UInt(7)))
    );
    assert_eq!(
        codec.get_field(&root, "label"),
        Some(&Value::Scalar(Scalar::Str(XdrString::with_text("abc", 8))))
    );
    assert_eq!(
        codec.get_field(&root, "choice.raw").and_then(Value::as_bytes),
        Some(&[1u8, 2, 3, 4][..])
    );
}

#[test]
fn test_resolve_rejects_duplicate_type() {
    let mut defs = holder_definitions();
    defs.enums.push(EnumDef::new("Holder", &[("A", 0)]));
    assert_eq!(
        Schema::resolve(defs).err(),
        Some(SchemaError::DuplicateType("Holder".to_string()))
    );
}

#[test]
fn test_resolve_rejects_duplicate_field() {
    let mut defs = holder_definitions();
    defs.structs[0]
        .fields
        .push(FieldDef::new("flag", TypeSpec::Int));
    assert_eq!(
        Schema::resolve(defs).err(),
        Some(SchemaError::DuplicateField {
            container: "Holder".to_string(),
            field: "flag".to_string(),
        })
    );
}

#[test]
fn test_resolve_rejects_unknown_references() {
    let mut defs = holder_definitions();
    defs.structs[0]
        .fields
        .push(FieldDef::new("other", TypeSpec::vec(TypeSpec::struct_ref("Missing"), 3)));
    assert_eq!(
        Schema::resolve(defs).err(),
        Some(SchemaError::UnknownStruct("Missing".to_string()))
    );

    let mut defs = holder_definitions();
    defs.unions.push(UnionDef::new(
        "ByColor",
        "type",
        Discriminant::Enum("Color".to_string()),
        vec![UnionArm::symbols(&["PURPLE"], None)],
    ));
    assert_eq!(
        Schema::resolve(defs).err(),
        Some(SchemaError::UnknownCase {
            union: "ByColor".to_string(),
            symbol: "PURPLE".to_string(),
        })
    );
}

#[test]
fn test_resolve_rejects_duplicate_case() {
    let mut defs = holder_definitions();
    defs.unions.push(UnionDef::new(
        "ByColor",
        "type",
        Discriminant::Enum("Color".to_string()),
        vec![
            UnionArm::symbols(&["RED"], None),
            UnionArm::values(&[0], None),
        ],
    ));
    assert_eq!(
        Schema::resolve(defs).err(),
        Some(SchemaError::DuplicateCase {
            union: "ByColor".to_string(),
            value: 0,
        })
    );
}

#[test]
fn test_default_union_uses_lowest_symbol_with_arm() {
    let schema = transaction::schema().expect("schema");
    let trust = schema
        .default_value(&TypeSpec::union_ref("AllowTrustAsset"))
        .expect("default");
    match trust {
        Value::Union(u) => {
            assert_eq!(u.discriminant(), Some(1));
            assert_eq!(
                u.arm.as_deref(),
                Some(&Value::FixedOpaque(txrep::value::FixedOpaque::zeroed(4, true)))
            );
        }
        other => panic!("expected union, got {:?}", other),
    }
}
