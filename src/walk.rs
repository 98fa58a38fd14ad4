//! Field extractor: find the node behind a dotted txrep field name.
//!
//! The walk visits nodes in the same order and under the same names as the encoder, but
//! renders nothing. It stops at the first node whose name equals the target and prunes any
//! subtree whose name is not a prefix of the target.
//!
//! ## What is found
//!
//! | Target | Result |
//! |--------|--------|
//! | Name of a struct, union, sequence or scalar | That node |
//! | Name of an optional | The [`Value::Optional`] itself, present or not |
//! | Path through an absent optional | `None` |
//! | Path into an inactive union arm | `None` |
//! | Pseudo-field (`.len`, `._present`) or unknown name | `None` |
//! | `...tx.sourceAccount` of a version-0 envelope | The 32-byte legacy key |
//!
//! Lookup first records the route as a list of [`Step`]s against a shared borrow, then
//! follows it. That lets [`get_field_mut`] reuse the same dispatch as [`get_field`].
//!
//! ## Example
//!
//! ```ignore
//! use txrep::transaction;
//!
//! let codec = transaction::codec()?;
//! let env = /* decoded TransactionEnvelope */;
//! let fee = codec.get_field(&env, "tx.fee");
//! let memo_text = codec.get_field(&env, "tx.memo.text"); // None unless memo is MEMO_TEXT
//! ```

use crate::ast::Schema;
use crate::name::{child, index, v0_source_alias};
use crate::value::Value;

/// One move from a node to a child node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Into a present optional.
    Inner,
    /// Array or sequence element.
    Elem(usize),
    /// Struct field by position.
    Field(usize),
    /// Union discriminant.
    Tag,
    /// Active union arm.
    Arm,
}

/// Whether `target` names `name` or something below it.
fn may_contain(name: &str, target: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    match target.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}

/// Route from `value` (named `name`) to the node named `target`.
pub fn find_path(schema: &Schema, name: &str, value: &Value, target: &str) -> Option<Vec<Step>> {
    let mut path = Vec::new();
    if locate(schema, name, value, target, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn locate(schema: &Schema, name: &str, value: &Value, target: &str, path: &mut Vec<Step>) -> bool {
    if name == target {
        return true;
    }
    if let Value::FixedOpaque(o) = value {
        if !o.code && v0_source_alias(name).as_deref() == Some(target) {
            return true;
        }
    }
    if !may_contain(name, target) {
        return false;
    }

    let mut descend = |step: Step, child_name: &str, child_value: &Value| -> bool {
        path.push(step);
        if locate(schema, child_name, child_value, target, path) {
            return true;
        }
        path.pop();
        false
    };

    match value {
        Value::Optional(opt) => match opt.value.as_deref() {
            Some(inner) => descend(Step::Inner, name, inner),
            None => false,
        },
        Value::Array(items) => items
            .iter()
            .enumerate()
            .any(|(i, item)| descend(Step::Elem(i), &index(name, i), item)),
        Value::Sequence(seq) => seq
            .items
            .iter()
            .enumerate()
            .any(|(i, item)| descend(Step::Elem(i), &index(name, i), item)),
        Value::Struct(s) => s
            .fields
            .iter()
            .enumerate()
            .any(|(i, (field, v))| descend(Step::Field(i), &child(name, field), v)),
        Value::Union(u) => {
            let Some(def) = schema.get_union(&u.ty) else {
                return false;
            };
            if descend(Step::Tag, &child(name, &def.def.tag_name), &u.tag) {
                return true;
            }
            let field = u.discriminant().and_then(|d| def.arm(d)).flatten();
            match (field, u.arm.as_deref()) {
                (Some(field), Some(arm)) => {
                    let arm_name = if def.def.inline {
                        name.to_string()
                    } else {
                        child(name, &field.name)
                    };
                    descend(Step::Arm, &arm_name, arm)
                }
                _ => false,
            }
        }
        Value::Scalar(_)
        | Value::Int64(_)
        | Value::Time(_)
        | Value::Enum(_)
        | Value::FixedOpaque(_)
        | Value::VarOpaque(_)
        | Value::AccountId(_)
        | Value::SignerKey(_)
        | Value::DecoratedSignature(_)
        | Value::Asset(_) => false,
    }
}

fn step(value: &Value, s: Step) -> Option<&Value> {
    match (value, s) {
        (Value::Optional(opt), Step::Inner) => opt.value.as_deref(),
        (Value::Array(items), Step::Elem(i)) => items.get(i),
        (Value::Sequence(seq), Step::Elem(i)) => seq.items.get(i),
        (Value::Struct(st), Step::Field(i)) => st.fields.get(i).map(|(_, v)| v),
        (Value::Union(u), Step::Tag) => Some(&u.tag),
        (Value::Union(u), Step::Arm) => u.arm.as_deref(),
        _ => None,
    }
}

fn step_mut(value: &mut Value, s: Step) -> Option<&mut Value> {
    match (value, s) {
        (Value::Optional(opt), Step::Inner) => opt.value.as_deref_mut(),
        (Value::Array(items), Step::Elem(i)) => items.get_mut(i),
        (Value::Sequence(seq), Step::Elem(i)) => seq.items.get_mut(i),
        (Value::Struct(st), Step::Field(i)) => st.fields.get_mut(i).map(|(_, v)| v),
        (Value::Union(u), Step::Tag) => Some(&mut u.tag),
        (Value::Union(u), Step::Arm) => u.arm.as_deref_mut(),
        _ => None,
    }
}

/// Follow a route found by [`find_path`].
pub fn follow<'v>(root: &'v Value, path: &[Step]) -> Option<&'v Value> {
    path.iter().try_fold(root, |v, s| step(v, *s))
}

pub fn follow_mut<'v>(root: &'v mut Value, path: &[Step]) -> Option<&'v mut Value> {
    path.iter().try_fold(root, |v, s| step_mut(v, *s))
}

/// Node named `field` below the unnamed root.
pub fn get_field<'v>(schema: &Schema, root: &'v Value, field: &str) -> Option<&'v Value> {
    let path = find_path(schema, "", root, field)?;
    follow(root, &path)
}

pub fn get_field_mut<'v>(schema: &Schema, root: &'v mut Value, field: &str) -> Option<&'v mut Value> {
    let path = find_path(schema, "", root, field)?;
    follow_mut(root, &path)
}
