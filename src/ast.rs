//! Type schema for typed XDR trees: the shapes a [`Value`](crate::value::Value) can take.
//!
//! A [`Definitions`] set is plain data (enums, structs, unions by name). It is checked and
//! indexed by [`Schema::resolve`], after which every traversal looks types up through the
//! resolved [`Schema`].

use crate::stellar::{AccountId, Asset, DecoratedSignature, SignerKey};
use crate::value::{
    EnumValue, FixedOpaque, Optional, Scalar, Sequence, StructValue, UnionValue, Value, VarOpaque,
    XdrString,
};
use std::collections::{HashMap, HashSet};

/// Field type specification.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Bool,
    Int,
    UInt,
    Hyper,
    UHyper,
    /// `string<max>`
    String(u32),
    /// int64 shown with its value scaled by 10^7.
    Amount,
    /// uint64 Unix timestamp.
    Time,
    Enum(String),
    /// `opaque[n]`, hex rendering.
    FixedOpaque(usize),
    /// `opaque[n]` holding a short identifier, code rendering.
    AssetCode(usize),
    /// `opaque<max>`
    VarOpaque(u32),
    Optional(Box<TypeSpec>),
    /// `T[n]`: fixed count, no `.len` line.
    Array(Box<TypeSpec>, usize),
    /// `T<max>`
    Vec(Box<TypeSpec>, u32),
    Struct(String),
    Union(String),
    AccountId,
    SignerKey,
    DecoratedSignature,
    Asset,
}

impl TypeSpec {
    pub fn optional(inner: TypeSpec) -> Self {
        TypeSpec::Optional(Box::new(inner))
    }

    pub fn vec(elem: TypeSpec, max: u32) -> Self {
        TypeSpec::Vec(Box::new(elem), max)
    }

    pub fn array(elem: TypeSpec, n: usize) -> Self {
        TypeSpec::Array(Box::new(elem), n)
    }

    pub fn struct_ref(name: &str) -> Self {
        TypeSpec::Struct(name.to_string())
    }

    pub fn union_ref(name: &str) -> Self {
        TypeSpec::Union(name.to_string())
    }

    pub fn enum_ref(name: &str) -> Self {
        TypeSpec::Enum(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub type_spec: TypeSpec,
}

impl FieldDef {
    pub fn new(name: &str, type_spec: TypeSpec) -> Self {
        FieldDef {
            name: name.to_string(),
            type_spec,
        }
    }
}

/// Enum symbol table in declaration order.
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub symbols: Vec<(String, i32)>,
}

impl EnumDef {
    pub fn new(name: &str, symbols: &[(&str, i32)]) -> Self {
        EnumDef {
            name: name.to_string(),
            symbols: symbols.iter().map(|(s, v)| (s.to_string(), *v)).collect(),
        }
    }

    pub fn symbol(&self, value: i32) -> Option<&str> {
        self.symbols
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(s, _)| s.as_str())
    }

    pub fn value_of(&self, symbol: &str) -> Option<i32> {
        self.symbols.iter().find(|(s, _)| s == symbol).map(|(_, v)| *v)
    }

    /// Symbols sorted by ordinal, as listed in help output.
    pub fn symbols_by_value(&self) -> Vec<&str> {
        let mut sorted: Vec<_> = self.symbols.iter().collect();
        sorted.sort_by_key(|(_, v)| *v);
        sorted.into_iter().map(|(s, _)| s.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    pub fn new(name: &str, fields: Vec<FieldDef>) -> Self {
        StructDef {
            name: name.to_string(),
            fields,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Discriminant {
    Enum(String),
    Int,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    Symbol(String),
    Value(i32),
}

/// One union arm; `field == None` is a void arm.
#[derive(Debug, Clone)]
pub struct UnionArm {
    pub cases: Vec<CaseLabel>,
    pub field: Option<FieldDef>,
}

impl UnionArm {
    pub fn symbols(symbols: &[&str], field: Option<FieldDef>) -> Self {
        UnionArm {
            cases: symbols
                .iter()
                .map(|s| CaseLabel::Symbol(s.to_string()))
                .collect(),
            field,
        }
    }

    pub fn values(values: &[i32], field: Option<FieldDef>) -> Self {
        UnionArm {
            cases: values.iter().map(|v| CaseLabel::Value(*v)).collect(),
            field,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UnionDef {
    pub name: String,
    /// Name of the discriminant field (`type`, `v`, ...).
    pub tag_name: String,
    pub discriminant: Discriminant,
    pub arms: Vec<UnionArm>,
    /// Arm used for discriminant values not listed in `arms`.
    pub default_arm: Option<Option<FieldDef>>,
    /// Render the active arm at the union's own name instead of `name.arm`.
    pub inline: bool,
}

impl UnionDef {
    pub fn new(name: &str, tag_name: &str, discriminant: Discriminant, arms: Vec<UnionArm>) -> Self {
        UnionDef {
            name: name.to_string(),
            tag_name: tag_name.to_string(),
            discriminant,
            arms,
            default_arm: None,
            inline: false,
        }
    }

    pub fn with_default(mut self, field: Option<FieldDef>) -> Self {
        self.default_arm = Some(field);
        self
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }
}

/// Unresolved type definitions, as produced by hand or by an IDL compiler.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub enums: Vec<EnumDef>,
    pub structs: Vec<StructDef>,
    pub unions: Vec<UnionDef>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Duplicate type name: {0}")]
    DuplicateType(String),
    #[error("Duplicate field {field} in {container}")]
    DuplicateField { container: String, field: String },
    #[error("Unknown enum: {0}")]
    UnknownEnum(String),
    #[error("Unknown struct: {0}")]
    UnknownStruct(String),
    #[error("Unknown union: {0}")]
    UnknownUnion(String),
    #[error("Union {union}: unknown case symbol {symbol}")]
    UnknownCase { union: String, symbol: String },
    #[error("Union {union}: duplicate case {value}")]
    DuplicateCase { union: String, value: i32 },
    #[error("Union {0} has no arm to default to")]
    EmptyUnion(String),
}

/// Union with case labels resolved to discriminant values.
#[derive(Debug, Clone)]
pub struct ResolvedUnion {
    pub def: UnionDef,
    arm_by_value: HashMap<i32, usize>,
}

impl ResolvedUnion {
    /// Arm for a discriminant value: `None` if the value has no arm, `Some(None)` for void.
    pub fn arm(&self, value: i32) -> Option<Option<&FieldDef>> {
        match self.arm_by_value.get(&value) {
            Some(&i) => Some(self.def.arms[i].field.as_ref()),
            None => self.def.default_arm.as_ref().map(|f| f.as_ref()),
        }
    }

    pub fn has_arm(&self, value: i32) -> bool {
        self.arm(value).is_some()
    }
}

/// Resolved schema: types by name for the traversals.
#[derive(Debug, Clone)]
pub struct Schema {
    enums: HashMap<String, EnumDef>,
    structs: HashMap<String, StructDef>,
    unions: HashMap<String, ResolvedUnion>,
}

impl Schema {
    pub fn resolve(defs: Definitions) -> Result<Self, SchemaError> {
        let mut names = HashSet::new();
        let all_names = defs
            .enums
            .iter()
            .map(|e| &e.name)
            .chain(defs.structs.iter().map(|s| &s.name))
            .chain(defs.unions.iter().map(|u| &u.name));
        for name in all_names {
            if !names.insert(name.clone()) {
                return Err(SchemaError::DuplicateType(name.clone()));
            }
        }

        let enums: HashMap<String, EnumDef> = defs
            .enums
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect();
        let structs: HashMap<String, StructDef> = defs
            .structs
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();
        let union_names: HashSet<String> = defs.unions.iter().map(|u| u.name.clone()).collect();

        let check_ref = |spec: &TypeSpec| -> Result<(), SchemaError> {
            check_type_ref(spec, &enums, &structs, &union_names)
        };

        for s in structs.values() {
            let mut seen = HashSet::new();
            for f in &s.fields {
                if !seen.insert(f.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        container: s.name.clone(),
                        field: f.name.clone(),
                    });
                }
                check_ref(&f.type_spec)?;
            }
        }

        let mut unions = HashMap::new();
        for u in defs.unions {
            let enum_def = match &u.discriminant {
                Discriminant::Enum(e) => Some(
                    enums
                        .get(e)
                        .ok_or_else(|| SchemaError::UnknownEnum(e.clone()))?,
                ),
                Discriminant::Int => None,
            };
            let mut arm_by_value = HashMap::new();
            for (i, arm) in u.arms.iter().enumerate() {
                if let Some(f) = &arm.field {
                    check_ref(&f.type_spec)?;
                }
                for case in &arm.cases {
                    let value = match (case, enum_def) {
                        (CaseLabel::Value(v), _) => *v,
                        (CaseLabel::Symbol(s), Some(e)) => {
                            e.value_of(s).ok_or_else(|| SchemaError::UnknownCase {
                                union: u.name.clone(),
                                symbol: s.clone(),
                            })?
                        }
                        (CaseLabel::Symbol(s), None) => {
                            return Err(SchemaError::UnknownCase {
                                union: u.name.clone(),
                                symbol: s.clone(),
                            })
                        }
                    };
                    if arm_by_value.insert(value, i).is_some() {
                        return Err(SchemaError::DuplicateCase {
                            union: u.name.clone(),
                            value,
                        });
                    }
                }
            }
            if let Some(Some(f)) = &u.default_arm {
                check_ref(&f.type_spec)?;
            }
            if arm_by_value.is_empty() && u.default_arm.is_none() {
                return Err(SchemaError::EmptyUnion(u.name.clone()));
            }
            unions.insert(u.name.clone(), ResolvedUnion { def: u, arm_by_value });
        }

        Ok(Schema {
            enums,
            structs,
            unions,
        })
    }

    pub fn get_enum(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    pub fn get_struct(&self, name: &str) -> Option<&StructDef> {
        self.structs.get(name)
    }

    pub fn get_union(&self, name: &str) -> Option<&ResolvedUnion> {
        self.unions.get(name)
    }

    /// Zero value for a type: used for fresh trees, new sequence elements and newly
    /// activated union arms or optionals.
    pub fn default_value(&self, spec: &TypeSpec) -> Result<Value, SchemaError> {
        Ok(match spec {
            TypeSpec::Bool => Value::Scalar(Scalar::Bool(false)),
            TypeSpec::Int => Value::Scalar(Scalar::Int(0)),
            TypeSpec::UInt => Value::Scalar(Scalar::UInt(0)),
            TypeSpec::Hyper => Value::Scalar(Scalar::Hyper(0)),
            TypeSpec::UHyper => Value::Scalar(Scalar::UHyper(0)),
            TypeSpec::String(max) => Value::Scalar(Scalar::Str(XdrString::new(*max))),
            TypeSpec::Amount => Value::Int64(0),
            TypeSpec::Time => Value::Time(0),
            TypeSpec::Enum(name) => {
                let def = self
                    .get_enum(name)
                    .ok_or_else(|| SchemaError::UnknownEnum(name.clone()))?;
                let value = def.symbols.first().map(|(_, v)| *v).unwrap_or(0);
                Value::Enum(EnumValue::new(name, value))
            }
            TypeSpec::FixedOpaque(n) => Value::FixedOpaque(FixedOpaque::zeroed(*n, false)),
            TypeSpec::AssetCode(n) => Value::FixedOpaque(FixedOpaque::zeroed(*n, true)),
            TypeSpec::VarOpaque(max) => Value::VarOpaque(VarOpaque::new(*max)),
            TypeSpec::Optional(inner) => Value::Optional(Optional::absent((**inner).clone())),
            TypeSpec::Array(elem, n) => {
                let mut items = Vec::with_capacity(*n);
                for _ in 0..*n {
                    items.push(self.default_value(elem)?);
                }
                Value::Array(items)
            }
            TypeSpec::Vec(elem, max) => Value::Sequence(Sequence::new((**elem).clone(), *max)),
            TypeSpec::Struct(name) => {
                let def = self
                    .get_struct(name)
                    .ok_or_else(|| SchemaError::UnknownStruct(name.clone()))?;
                let mut fields = Vec::with_capacity(def.fields.len());
                for f in &def.fields {
                    fields.push((f.name.clone(), self.default_value(&f.type_spec)?));
                }
                Value::Struct(StructValue::new(name, fields))
            }
            TypeSpec::Union(name) => {
                let u = self
                    .get_union(name)
                    .ok_or_else(|| SchemaError::UnknownUnion(name.clone()))?;
                let value = self.default_discriminant(u);
                self.union_with(name, value)?
            }
            TypeSpec::AccountId => Value::AccountId(AccountId::default()),
            TypeSpec::SignerKey => Value::SignerKey(SignerKey::default()),
            TypeSpec::DecoratedSignature => {
                Value::DecoratedSignature(DecoratedSignature::default())
            }
            TypeSpec::Asset => Value::Asset(Asset::Native),
        })
    }

    /// Union value with the given discriminant and a default arm.
    pub fn union_with(&self, name: &str, value: i32) -> Result<Value, SchemaError> {
        let u = self
            .get_union(name)
            .ok_or_else(|| SchemaError::UnknownUnion(name.to_string()))?;
        let tag = match &u.def.discriminant {
            Discriminant::Enum(e) => Value::Enum(EnumValue::new(e, value)),
            Discriminant::Int => Value::Scalar(Scalar::Int(value)),
        };
        let arm = match u.arm(value) {
            Some(Some(f)) => Some(Box::new(self.default_value(&f.type_spec)?)),
            _ => None,
        };
        Ok(Value::Union(UnionValue::new(name, tag, arm)))
    }

    fn default_discriminant(&self, u: &ResolvedUnion) -> i32 {
        if let Discriminant::Enum(e) = &u.def.discriminant {
            if let Some(def) = self.get_enum(e) {
                let mut values: Vec<i32> = def.symbols.iter().map(|(_, v)| *v).collect();
                values.sort_unstable();
                if let Some(v) = values.into_iter().find(|v| u.has_arm(*v)) {
                    return v;
                }
            }
        }
        let mut values: Vec<i32> = u.arm_by_value.keys().copied().collect();
        values.sort_unstable();
        values.first().copied().unwrap_or(0)
    }
}

fn check_type_ref(
    spec: &TypeSpec,
    enums: &HashMap<String, EnumDef>,
    structs: &HashMap<String, StructDef>,
    unions: &HashSet<String>,
) -> Result<(), SchemaError> {
    match spec {
        TypeSpec::Enum(name) if !enums.contains_key(name) => {
            Err(SchemaError::UnknownEnum(name.clone()))
        }
        TypeSpec::Struct(name) if !structs.contains_key(name) => {
            Err(SchemaError::UnknownStruct(name.clone()))
        }
        TypeSpec::Union(name) if !unions.contains(name) => {
            Err(SchemaError::UnknownUnion(name.clone()))
        }
        TypeSpec::Optional(inner) | TypeSpec::Array(inner, _) | TypeSpec::Vec(inner, _) => {
            check_type_ref(inner, enums, structs, unions)
        }
        _ => Ok(()),
    }
}
