//! Encode traversal: typed tree to txrep lines.
//!
//! Walks the tree depth-first in declaration order and writes `name: value` lines. A node
//! that cannot be rendered (unknown enum value, discriminant without an arm, over-long
//! sequence) is recorded as a [`BadValue`] and the walk moves on to its siblings.

use crate::annotate::Annotate;
use crate::ast::Schema;
use crate::codec::{BadValue, BadValues, Encoded};
use crate::name::{child, index, len_field, present_field, v0_source_alias};
use crate::render::{date_comment, render_code, render_opaque, render_string, scale_fmt};
use crate::stellar::{AccountId, DecoratedSignature};
use crate::value::{Scalar, UnionValue, Value};
use std::fmt::Display;

/// Exponent of the scaled form shown next to int64 amounts.
pub const AMOUNT_EXP: u32 = 7;

pub(crate) struct Marshal<'a> {
    schema: &'a Schema,
    annotate: &'a dyn Annotate,
    envelope: &'a Value,
    out: String,
    errors: Vec<BadValue>,
    /// Number of directly nested optionals around the current node.
    ptr_depth: usize,
}

impl<'a> Marshal<'a> {
    pub(crate) fn new(schema: &'a Schema, annotate: &'a dyn Annotate, envelope: &'a Value) -> Self {
        Marshal {
            schema,
            annotate,
            envelope,
            out: String::new(),
            errors: Vec::new(),
            ptr_depth: 0,
        }
    }

    pub(crate) fn finish(self) -> Encoded {
        Encoded {
            text: self.out,
            errors: BadValues(self.errors),
        }
    }

    fn line(&mut self, name: &str, value: impl Display) {
        self.out.push_str(&format!("{}: {}\n", name, value));
    }

    fn noted_line(&mut self, name: &str, value: impl Display, note: String) {
        if note.is_empty() {
            self.line(name, value);
        } else {
            self.line(name, format!("{} ({})", value, note));
        }
    }

    pub(crate) fn marshal(&mut self, name: &str, value: &Value) {
        let outer = self.ptr_depth;
        self.ptr_depth = match value {
            Value::Optional(_) => outer + 1,
            _ => 0,
        };
        if let Err(msg) = self.marshal_node(name, value) {
            tracing::debug!(field = name, %msg, "cannot render field");
            self.errors.push(BadValue {
                field: name.to_string(),
                msg,
            });
        }
        self.ptr_depth = outer;
    }

    fn marshal_node(&mut self, name: &str, value: &Value) -> Result<(), String> {
        if let Value::FixedOpaque(o) = value {
            if let (false, Some(short)) = (o.code, v0_source_alias(name)) {
                let key: [u8; 32] = o
                    .bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| format!("expected 32 bytes, found {}", o.bytes.len()))?;
                self.account_line(&short, &AccountId::Ed25519(key));
                return Ok(());
            }
        }

        match value {
            Value::Scalar(s) => {
                let text = render_scalar(s);
                self.line(name, text);
                if let Scalar::Str(x) = s {
                    check_len(x.bytes.len(), x.max)?;
                }
            }
            Value::Int64(v) => self.line(name, format!("{} ({})", v, scale_fmt(*v, AMOUNT_EXP))),
            Value::Time(t) => self.line(name, format!("{}{}", t, date_comment(*t))),
            Value::Enum(e) => {
                let schema = self.schema;
                let def = schema
                    .get_enum(&e.ty)
                    .ok_or_else(|| format!("unknown enum {}", e.ty))?;
                let symbol = def
                    .symbol(e.value)
                    .ok_or_else(|| format!("invalid value {} for {}", e.value, e.ty))?;
                if self.annotate.wants_help(name) {
                    let choices = def.symbols_by_value().join(", ");
                    self.line(name, format!("{} ({})", symbol, choices));
                } else {
                    self.line(name, symbol);
                }
            }
            Value::FixedOpaque(o) => {
                if o.code {
                    self.line(name, render_code(&o.bytes));
                } else {
                    self.line(name, hex::encode(&o.bytes));
                }
            }
            Value::VarOpaque(o) => {
                self.line(name, render_opaque(&o.bytes));
                check_len(o.bytes.len(), o.max)?;
            }
            Value::Optional(opt) => {
                self.line(&present_field(name, self.ptr_depth), opt.is_present());
                if let Some(inner) = &opt.value {
                    self.marshal(name, inner);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.marshal(&index(name, i), item);
                }
            }
            Value::Sequence(seq) => {
                self.line(&len_field(name), seq.items.len());
                for (i, item) in seq.items.iter().enumerate() {
                    self.marshal(&index(name, i), item);
                }
                if seq.items.len() as u64 > u64::from(seq.max) {
                    return Err(format!(
                        "{} ({}) exceeds maximum size {}.",
                        len_field(name),
                        seq.items.len(),
                        seq.max
                    ));
                }
            }
            Value::Struct(s) => {
                for (field, v) in &s.fields {
                    self.marshal(&child(name, field), v);
                }
            }
            Value::Union(u) => self.marshal_union(name, u)?,
            Value::AccountId(a) => self.account_line(name, a),
            Value::SignerKey(k) => {
                let note = self.annotate.signer_key_note(k);
                self.noted_line(name, k, note);
            }
            Value::DecoratedSignature(sig) => self.signature_lines(name, sig)?,
            Value::Asset(a) => {
                if a.is_native() {
                    let alias = self.annotate.native_asset_alias().to_string();
                    self.line(name, alias);
                } else {
                    self.line(name, a);
                }
            }
        }
        Ok(())
    }

    fn marshal_union(&mut self, name: &str, u: &UnionValue) -> Result<(), String> {
        let schema = self.schema;
        let def = schema
            .get_union(&u.ty)
            .ok_or_else(|| format!("unknown union {}", u.ty))?;
        let disc = u
            .discriminant()
            .ok_or_else(|| format!("{} has a non-integer discriminant", u.ty))?;
        let arm = def
            .arm(disc)
            .ok_or_else(|| format!("invalid discriminant {} for {}", disc, u.ty))?;

        self.marshal(&child(name, &def.def.tag_name), &u.tag);
        match (arm, &u.arm) {
            (Some(field), Some(v)) => {
                let arm_name = if def.def.inline {
                    name.to_string()
                } else {
                    child(name, &field.name)
                };
                self.marshal(&arm_name, v);
                Ok(())
            }
            (None, None) => Ok(()),
            (Some(field), None) => Err(format!("{} is missing arm {}", u.ty, field.name)),
            (None, Some(_)) => Err(format!("void arm of {} carries a value", u.ty)),
        }
    }

    fn account_line(&mut self, name: &str, account: &AccountId) {
        let note = self.annotate.account_note(account);
        self.noted_line(name, account, note);
    }

    fn signature_lines(&mut self, name: &str, sig: &DecoratedSignature) -> Result<(), String> {
        let note = self.annotate.signer_note(self.envelope, sig);
        self.noted_line(&child(name, "hint"), hex::encode(sig.hint), note);
        self.line(&child(name, "signature"), render_opaque(&sig.signature));
        check_len(sig.signature.len(), DecoratedSignature::MAX_SIGNATURE)
    }
}

fn render_scalar(s: &Scalar) -> String {
    match s {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(v) => v.to_string(),
        Scalar::UInt(v) => v.to_string(),
        Scalar::Hyper(v) => v.to_string(),
        Scalar::UHyper(v) => v.to_string(),
        Scalar::Str(x) => render_string(&x.bytes),
    }
}

fn check_len(len: usize, max: u32) -> Result<(), String> {
    if len as u64 > u64::from(max) {
        Err(format!("length {} exceeds maximum size {}", len, max))
    } else {
        Ok(())
    }
}
