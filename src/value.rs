//! The typed tree walked by the txrep traversals.
//!
//! [`Value`] is a closed sum of node kinds; the encoder, decoder and field extractor each
//! match it exhaustively. Aggregates carry their type name so traversals can look up symbol
//! tables and union arms in the [`Schema`](crate::ast::Schema).

use crate::ast::TypeSpec;
use crate::stellar::{AccountId, Asset, DecoratedSignature, SignerKey};

/// A node of the typed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// int64 rendered with its 10^7-scaled form.
    Int64(i64),
    /// Unix timestamp.
    Time(u64),
    Enum(EnumValue),
    FixedOpaque(FixedOpaque),
    VarOpaque(VarOpaque),
    Optional(Optional),
    /// Fixed-count array.
    Array(Vec<Value>),
    Sequence(Sequence),
    Struct(StructValue),
    Union(UnionValue),
    AccountId(AccountId),
    SignerKey(SignerKey),
    DecoratedSignature(DecoratedSignature),
    Asset(Asset),
}

/// Single-line values with a plain textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Hyper(i64),
    UHyper(u64),
    Str(XdrString),
}

/// `string<max>`: raw bytes, not necessarily UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct XdrString {
    pub bytes: Vec<u8>,
    pub max: u32,
}

impl XdrString {
    pub fn new(max: u32) -> Self {
        XdrString {
            bytes: Vec::new(),
            max,
        }
    }

    pub fn with_text(text: &str, max: u32) -> Self {
        XdrString {
            bytes: text.as_bytes().to_vec(),
            max,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub ty: String,
    pub value: i32,
}

impl EnumValue {
    pub fn new(ty: &str, value: i32) -> Self {
        EnumValue {
            ty: ty.to_string(),
            value,
        }
    }
}

/// `opaque[n]`. With `code` set, rendered as a trimmed, escaped identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedOpaque {
    pub bytes: Vec<u8>,
    pub code: bool,
}

impl FixedOpaque {
    pub fn zeroed(n: usize, code: bool) -> Self {
        FixedOpaque {
            bytes: vec![0; n],
            code,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarOpaque {
    pub bytes: Vec<u8>,
    pub max: u32,
}

impl VarOpaque {
    pub fn new(max: u32) -> Self {
        VarOpaque {
            bytes: Vec::new(),
            max,
        }
    }
}

/// Pointer-like node: the inner type is kept so presence can be switched on.
#[derive(Debug, Clone, PartialEq)]
pub struct Optional {
    pub inner: TypeSpec,
    pub value: Option<Box<Value>>,
}

impl Optional {
    pub fn absent(inner: TypeSpec) -> Self {
        Optional { inner, value: None }
    }

    pub fn present(inner: TypeSpec, value: Value) -> Self {
        Optional {
            inner,
            value: Some(Box::new(value)),
        }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

/// Variable-length array `T<max>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub elem: TypeSpec,
    pub max: u32,
    pub items: Vec<Value>,
}

impl Sequence {
    pub fn new(elem: TypeSpec, max: u32) -> Self {
        Sequence {
            elem,
            max,
            items: Vec::new(),
        }
    }

    pub fn size(&self) -> BoundedSize {
        BoundedSize {
            value: self.items.len() as u32,
            bound: self.max,
        }
    }
}

/// A count with a hard upper bound (sequence lengths, opaque and string sizes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedSize {
    pub value: u32,
    pub bound: u32,
}

impl BoundedSize {
    pub fn new(bound: u32) -> Self {
        BoundedSize { value: 0, bound }
    }

    /// Set the count, clamping to the bound. Returns the rejected size on overflow.
    pub fn set(&mut self, size: u64) -> Result<(), u64> {
        if size <= u64::from(self.bound) {
            self.value = size as u32;
            Ok(())
        } else {
            self.value = self.bound;
            Err(size)
        }
    }
}

/// Struct fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub ty: String,
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    pub fn new(ty: &str, fields: Vec<(String, Value)>) -> Self {
        StructValue {
            ty: ty.to_string(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == field).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(n, _)| n == field)
            .map(|(_, v)| v)
    }
}

/// Discriminated union. `tag` is a [`Value::Enum`] or an int [`Value::Scalar`];
/// `arm` is `None` for void arms.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionValue {
    pub ty: String,
    pub tag: Box<Value>,
    pub arm: Option<Box<Value>>,
}

impl UnionValue {
    pub fn new(ty: &str, tag: Value, arm: Option<Box<Value>>) -> Self {
        UnionValue {
            ty: ty.to_string(),
            tag: Box::new(tag),
            arm,
        }
    }

    pub fn discriminant(&self) -> Option<i32> {
        self.tag.discriminant()
    }
}

impl Value {
    /// Integer value of a union tag.
    pub fn discriminant(&self) -> Option<i32> {
        match self {
            Value::Enum(e) => Some(e.value),
            Value::Scalar(Scalar::Int(v)) => Some(*v),
            Value::Scalar(Scalar::UInt(v)) => i32::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionValue> {
        match self {
            Value::Union(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Scalar(Scalar::UInt(x)) => Some(u64::from(*x)),
            Value::Scalar(Scalar::UHyper(x)) => Some(*x),
            Value::Time(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Scalar(Scalar::Int(x)) => Some(i64::from(*x)),
            Value::Scalar(Scalar::UInt(x)) => Some(i64::from(*x)),
            Value::Scalar(Scalar::Hyper(x)) => Some(*x),
            Value::Int64(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::FixedOpaque(o) => Some(&o.bytes),
            Value::VarOpaque(o) => Some(&o.bytes),
            _ => None,
        }
    }
}
