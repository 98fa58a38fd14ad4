//! Decode traversal: txrep lines into a typed tree, in place.
//!
//! The document is first split into a name table ([`read_table`]); the tree is then walked
//! exactly as the encoder would walk it, consuming each expected name. Every problem is
//! recorded against its line and the walk continues, so a single pass reports all of them.

use crate::annotate::Annotate;
use crate::ast::{Schema, TypeSpec};
use crate::codec::{LineError, ScanError, TxrepError};
use crate::name::{child, index, len_field, present_field, v0_source_alias};
use crate::parser::{read_table, LineTable};
use crate::render::{first_token, scan_code, scan_fixed_opaque, scan_opaque, scan_string};
use crate::stellar::{AccountId, Asset, DecoratedSignature, SignerKey};
use crate::value::{Scalar, UnionValue, Value};
use std::str::FromStr;

/// What the document says about one field name.
enum Entry {
    Missing,
    /// The value was only `?`.
    HelpOnly,
    Value { line: usize, text: String },
}

pub(crate) struct Scan<'a> {
    schema: &'a Schema,
    annotate: &'a mut dyn Annotate,
    kvs: LineTable,
    errors: Vec<LineError>,
    ptr_depth: usize,
}

impl<'a> Scan<'a> {
    pub(crate) fn new(schema: &'a Schema, input: &str, annotate: &'a mut dyn Annotate) -> Self {
        let (kvs, errors) = read_table(input);
        Scan {
            schema,
            annotate,
            kvs,
            errors,
            ptr_depth: 0,
        }
    }

    pub(crate) fn finish(self) -> Result<(), TxrepError> {
        if !self.kvs.is_empty() {
            tracing::debug!(
                unconsumed = self.kvs.len(),
                first = self.kvs.names().next().unwrap_or_default(),
                "ignoring fields outside the schema"
            );
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TxrepError(self.errors))
        }
    }

    fn report(&mut self, line: usize, error: ScanError) {
        tracing::debug!(line, %error, "txrep line rejected");
        self.errors.push(LineError::new(line, error));
    }

    fn parse_error(&mut self, name: &str, line: usize, error: ScanError) {
        self.annotate.note_help_requested(name);
        self.report(line, error);
    }

    /// Consume a field, stripping and recording a trailing `?`.
    fn take(&mut self, name: &str) -> Entry {
        let Some(lv) = self.kvs.take(name) else {
            return Entry::Missing;
        };
        let mut text = lv.val.trim_end();
        if let Some(stripped) = text.strip_suffix('?') {
            self.annotate.note_help_requested(name);
            text = stripped;
            if text.trim().is_empty() {
                return Entry::HelpOnly;
            }
        }
        Entry::Value {
            line: lv.line,
            text: text.to_string(),
        }
    }

    /// Consume and parse a field with `parse`. `None` leaves the target untouched.
    fn take_parsed<T, E: ToString>(
        &mut self,
        name: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Option<(usize, T)> {
        match self.take(name) {
            Entry::Value { line, text } => match parse(&text) {
                Ok(v) => Some((line, v)),
                Err(e) => {
                    self.parse_error(name, line, ScanError::Parse(e.to_string()));
                    None
                }
            },
            _ => None,
        }
    }

    fn new_value(&mut self, spec: &TypeSpec, line: usize) -> Option<Value> {
        match self.schema.default_value(spec) {
            Ok(v) => Some(v),
            Err(e) => {
                self.report(line, ScanError::Semantic(e.to_string()));
                None
            }
        }
    }

    pub(crate) fn scan(&mut self, name: &str, value: &mut Value) {
        let outer = self.ptr_depth;
        self.ptr_depth = match value {
            Value::Optional(_) => outer + 1,
            _ => 0,
        };
        self.scan_node(name, value);
        self.ptr_depth = outer;
    }

    fn scan_node(&mut self, name: &str, value: &mut Value) {
        if let Value::FixedOpaque(o) = value {
            if let (false, Some(short)) = (o.code, v0_source_alias(name)) {
                if self.scan_v0_source(name, &short, &mut o.bytes) {
                    return;
                }
            }
        }

        match value {
            Value::Scalar(s) => self.scan_scalar(name, s),
            Value::Int64(v) => {
                if let Some((_, x)) = self.take_parsed(name, |t| first_token(t).parse::<i64>()) {
                    *v = x;
                }
            }
            Value::Time(v) => {
                if let Some((_, x)) = self.take_parsed(name, |t| first_token(t).parse::<u64>()) {
                    *v = x;
                }
            }
            Value::Enum(e) => {
                let schema = self.schema;
                let Some(def) = schema.get_enum(&e.ty) else {
                    return;
                };
                let parsed = self.take_parsed(name, |t| {
                    let token = first_token(t);
                    def.value_of(token)
                        .or_else(|| token.parse::<i32>().ok().filter(|v| def.symbol(*v).is_some()))
                        .ok_or_else(|| format!("unknown {} value {:?}", def.name, token))
                });
                if let Some((_, v)) = parsed {
                    e.value = v;
                }
            }
            Value::FixedOpaque(o) => {
                let len = o.bytes.len();
                if o.code {
                    if let Entry::Value { line, text } = self.take(name) {
                        match scan_code(&text, len) {
                            Ok(bytes) => o.bytes = bytes,
                            Err(e) => self.parse_error(name, line, e.into()),
                        }
                    }
                } else if let Some((_, bytes)) =
                    self.take_parsed(name, |t| scan_fixed_opaque(t, len))
                {
                    o.bytes = bytes;
                }
            }
            Value::VarOpaque(o) => {
                if let Some((line, bytes)) = self.take_parsed(name, scan_opaque) {
                    o.bytes = self.bounded(name, line, bytes, o.max);
                }
            }
            Value::Optional(opt) => {
                let present = self.presence(name);
                if !present {
                    opt.value = None;
                    return;
                }
                if opt.value.is_none() {
                    let line = self.kvs.get(name).map_or(0, |lv| lv.line);
                    opt.value = self.new_value(&opt.inner, line).map(Box::new);
                }
                if let Some(inner) = opt.value.as_deref_mut() {
                    self.scan(name, inner);
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.scan(&index(name, i), item);
                }
            }
            Value::Sequence(seq) => {
                let len_name = len_field(name);
                let mut size = seq.size();
                let mut len_line = 0;
                match self.take(&len_name) {
                    Entry::Missing => size.value = 0,
                    Entry::HelpOnly => {}
                    Entry::Value { line, text } => {
                        len_line = line;
                        match first_token(&text).parse::<u64>() {
                            Ok(n) => {
                                if let Err(n) = size.set(n) {
                                    self.report(
                                        line,
                                        ScanError::Bound {
                                            field: len_name.clone(),
                                            size: n,
                                            max: size.bound,
                                        },
                                    );
                                }
                            }
                            Err(e) => self.parse_error(&len_name, line, ScanError::Parse(e.to_string())),
                        }
                    }
                }
                let want = size.value as usize;
                seq.items.truncate(want);
                while seq.items.len() < want {
                    match self.new_value(&seq.elem, len_line) {
                        Some(v) => seq.items.push(v),
                        None => break,
                    }
                }
                for (i, item) in seq.items.iter_mut().enumerate() {
                    self.scan(&index(name, i), item);
                }
            }
            Value::Struct(s) => {
                for (field, v) in s.fields.iter_mut() {
                    let n = child(name, field);
                    self.scan(&n, v);
                }
            }
            Value::Union(u) => self.scan_union(name, u),
            Value::AccountId(a) => {
                if let Some((_, x)) = self.take_parsed(name, |t| AccountId::from_str(first_token(t))) {
                    *a = x;
                }
            }
            Value::SignerKey(k) => {
                if let Some((_, x)) = self.take_parsed(name, |t| SignerKey::from_str(first_token(t))) {
                    *k = x;
                }
            }
            Value::DecoratedSignature(sig) => self.scan_signature(name, sig),
            Value::Asset(a) => {
                let alias = self.annotate.native_asset_alias().to_string();
                let parsed = self.take_parsed(name, |t| {
                    let token = first_token(t);
                    if token == alias {
                        Ok(Asset::Native)
                    } else {
                        Asset::from_str(token)
                    }
                });
                if let Some((_, x)) = parsed {
                    *a = x;
                }
            }
        }
    }

    fn scan_scalar(&mut self, name: &str, s: &mut Scalar) {
        match s {
            Scalar::Bool(b) => {
                let parsed = self.take_parsed(name, |t| match first_token(t) {
                    "true" => Ok(true),
                    "false" => Ok(false),
                    other => Err(format!("expected true or false, found {:?}", other)),
                });
                if let Some((_, x)) = parsed {
                    *b = x;
                }
            }
            Scalar::Int(v) => {
                if let Some((_, x)) = self.take_parsed(name, |t| first_token(t).parse::<i32>()) {
                    *v = x;
                }
            }
            Scalar::UInt(v) => {
                if let Some((_, x)) = self.take_parsed(name, |t| first_token(t).parse::<u32>()) {
                    *v = x;
                }
            }
            Scalar::Hyper(v) => {
                if let Some((_, x)) = self.take_parsed(name, |t| first_token(t).parse::<i64>()) {
                    *v = x;
                }
            }
            Scalar::UHyper(v) => {
                if let Some((_, x)) = self.take_parsed(name, |t| first_token(t).parse::<u64>()) {
                    *v = x;
                }
            }
            Scalar::Str(x) => {
                if let Some((line, bytes)) = self.take_parsed(name, scan_string) {
                    x.bytes = self.bounded(name, line, bytes, x.max);
                }
            }
        }
    }

    /// Truncate `bytes` to `max`, reporting the overflow.
    fn bounded(&mut self, name: &str, line: usize, mut bytes: Vec<u8>, max: u32) -> Vec<u8> {
        if bytes.len() as u64 > u64::from(max) {
            self.report(
                line,
                ScanError::Bound {
                    field: name.to_string(),
                    size: bytes.len() as u64,
                    max,
                },
            );
            bytes.truncate(max as usize);
        }
        bytes
    }

    fn presence(&mut self, name: &str) -> bool {
        let present_name = present_field(name, self.ptr_depth);
        match self.take(&present_name) {
            Entry::Value { line, text } => match first_token(&text) {
                "true" => return true,
                "false" => return false,
                other => {
                    let msg = format!("{} ({}) must be true or false", present_name, other);
                    self.report(line, ScanError::Semantic(msg));
                    return true;
                }
            },
            Entry::Missing | Entry::HelpOnly => {}
        }
        self.kvs.contains(name)
            || self.kvs.has_prefix(&format!("{}.", name))
            || self.kvs.has_prefix(&format!("{}[", name))
    }

    fn scan_union(&mut self, name: &str, u: &mut UnionValue) {
        let schema = self.schema;
        let Some(def) = schema.get_union(&u.ty) else {
            return;
        };
        let tag_name = child(name, &def.def.tag_name);
        let tag_line = self.kvs.get(&tag_name).map_or(0, |lv| lv.line);
        let old_tag = (*u.tag).clone();
        self.scan(&tag_name, &mut u.tag);

        let mut changed = *u.tag != old_tag;
        if changed && u.discriminant().and_then(|d| def.arm(d)).is_none() {
            let msg = format!(
                "{} has no arm for {} {}",
                u.ty,
                tag_name,
                u.discriminant().unwrap_or_default()
            );
            self.report(tag_line, ScanError::Semantic(msg));
            u.tag = Box::new(old_tag);
            changed = false;
        }
        let Some(arm) = u.discriminant().and_then(|d| def.arm(d)) else {
            return;
        };

        match arm {
            None => u.arm = None,
            Some(field) => {
                if changed || u.arm.is_none() {
                    u.arm = self.new_value(&field.type_spec, tag_line).map(Box::new);
                }
                let arm_name = if def.def.inline {
                    name.to_string()
                } else {
                    child(name, &field.name)
                };
                if let Some(v) = u.arm.as_deref_mut() {
                    self.scan(&arm_name, v);
                }
            }
        }
    }

    fn scan_signature(&mut self, name: &str, sig: &mut DecoratedSignature) {
        let hint_name = child(name, "hint");
        if let Some((_, bytes)) = self.take_parsed(&hint_name, |t| scan_fixed_opaque(t, 4)) {
            sig.hint.copy_from_slice(&bytes);
        }
        let sig_name = child(name, "signature");
        if let Some((line, bytes)) = self.take_parsed(&sig_name, scan_opaque) {
            sig.signature = self.bounded(&sig_name, line, bytes, DecoratedSignature::MAX_SIGNATURE);
        }
    }

    /// Read a version-0 source key from its short account form. Returns false when the
    /// short name is absent, so the legacy hex field is read instead.
    fn scan_v0_source(&mut self, legacy: &str, short: &str, key: &mut Vec<u8>) -> bool {
        match self.take(short) {
            Entry::Missing => return false,
            Entry::HelpOnly => {}
            Entry::Value { line, text } => match AccountId::from_str(first_token(&text)) {
                Ok(AccountId::Ed25519(k)) => *key = k.to_vec(),
                Ok(AccountId::MuxedEd25519 { .. }) => {
                    let msg = "sourceAccount must be type Ed25519 for V0 transaction".to_string();
                    self.report(line, ScanError::Semantic(msg));
                }
                Err(e) => self.parse_error(short, line, ScanError::Parse(e.to_string())),
            },
        }
        if let Some(lv) = self.kvs.take(legacy) {
            tracing::trace!(line = lv.line, "legacy source key shadowed by {}", short);
        }
        true
    }
}
