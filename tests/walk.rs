//! Field extractor: lookups by dotted name, absent optionals, inactive arms, mutation.

use txrep::transaction;
use txrep::value::{EnumValue, Scalar};
use txrep::walk::{find_path, follow, Step};
use txrep::{Codec, NoAnnotations, Value};

const G2: &str = "GCV2XK5LVOV2XK5LVOV2XK5LVOV2XK5LVOV2XK5LVOV2XK5LVOV2WIHP";

fn envelope(codec: &Codec) -> Value {
    let doc = format!(
        "type: ENVELOPE_TYPE_TX
tx.fee: 10
tx.operations.len: 2
tx.operations[0].body.type: INFLATION
tx.operations[1].body.type: PAYMENT
tx.operations[1].body.paymentOp.destination: {}
tx.operations[1].body.paymentOp.amount: 250
",
        G2
    );
    let mut env = codec
        .default_value(&transaction::envelope_spec())
        .expect("default envelope");
    codec
        .decode(&doc, &mut env, &mut NoAnnotations)
        .expect("decode");
    env
}

#[test]
fn test_get_scalar_and_nested_fields() {
    let codec = transaction::codec().expect("schema");
    let env = envelope(&codec);
    assert_eq!(
        codec.get_field(&env, "tx.fee"),
        Some(&Value::Scalar(Scalar::UInt(10)))
    );
    assert_eq!(
        codec.get_field(&env, "tx.operations[1].body.paymentOp.amount"),
        Some(&Value::Int64(250))
    );
    assert_eq!(
        codec.get_field(&env, "tx.operations[1].body.type"),
        Some(&Value::Enum(EnumValue::new("OperationType", 1)))
    );
    assert_eq!(
        codec.get_field(&env, "type"),
        Some(&Value::Enum(EnumValue::new("EnvelopeType", 2)))
    );
    assert_eq!(codec.get_field(&env, ""), Some(&env));
}

#[test]
fn test_optional_is_returned_even_when_absent() {
    let codec = transaction::codec().expect("schema");
    let env = envelope(&codec);
    match codec.get_field(&env, "tx.timeBounds") {
        Some(Value::Optional(opt)) => assert!(!opt.is_present()),
        other => panic!("expected optional, got {:?}", other),
    }
    assert_eq!(codec.get_field(&env, "tx.timeBounds.minTime"), None);
}

#[test]
fn test_inactive_arm_and_unknown_names() {
    let codec = transaction::codec().expect("schema");
    let env = envelope(&codec);
    assert_eq!(codec.get_field(&env, "tx.memo.text"), None);
    assert_eq!(
        codec.get_field(&env, "tx.operations[1].body.createAccountOp"),
        None
    );
    assert_eq!(codec.get_field(&env, "tx.operations[0].body.paymentOp"), None);
    assert_eq!(codec.get_field(&env, "tx.operations[2]"), None);
    assert_eq!(codec.get_field(&env, "tx.operations.len"), None);
    assert_eq!(codec.get_field(&env, "tx.feeX"), None);
    assert_eq!(codec.get_field(&env, "v0.tx.fee"), None);
    assert_eq!(codec.get_field(&env, "signatures[0]"), None);
}

#[test]
fn test_path_steps() {
    let codec = transaction::codec().expect("schema");
    let env = envelope(&codec);
    let path = find_path(codec.schema(), "", &env, "tx.operations[1].body.type").expect("path");
    assert_eq!(
        path,
        vec![
            Step::Arm,
            Step::Field(0),
            Step::Field(5),
            Step::Elem(1),
            Step::Field(1),
            Step::Tag,
        ]
    );
    assert_eq!(
        follow(&env, &path),
        codec.get_field(&env, "tx.operations[1].body.type")
    );
}

#[test]
fn test_get_field_mut_edits_tree() {
    let codec = transaction::codec().expect("schema");
    let mut env = envelope(&codec);
    *codec.get_field_mut(&mut env, "tx.fee").expect("fee") = Value::Scalar(Scalar::UInt(500));
    let text = codec.encode(&env, &NoAnnotations).text;
    assert!(text.contains("tx.fee: 500\n"));
    assert!(codec.get_field_mut(&mut env, "tx.memo.id").is_none());
}
