//! Annotation hooks consulted by the traversals.
//!
//! Every method has a no-op default, so an annotator only overrides what it decorates.
//! Encoding sees annotations through `&dyn Annotate`; decoding takes `&mut dyn Annotate`
//! only so that [`Annotate::note_help_requested`] can record `?` fields.

use crate::stellar::{AccountId, DecoratedSignature, SignerKey};
use crate::value::Value;
use std::collections::BTreeSet;

pub trait Annotate {
    /// Comment shown after an account address, or empty.
    fn account_note(&self, _account: &AccountId) -> String {
        String::new()
    }

    /// Comment shown after a signature hint. `envelope` is the root of the traversal.
    fn signer_note(&self, _envelope: &Value, _sig: &DecoratedSignature) -> String {
        String::new()
    }

    /// Comment shown after a bare signer key, or empty.
    fn signer_key_note(&self, _key: &SignerKey) -> String {
        String::new()
    }

    /// Whether an enum field should list all of its symbols.
    fn wants_help(&self, _field: &str) -> bool {
        false
    }

    /// Called while decoding when a field's value ends in `?`.
    fn note_help_requested(&mut self, _field: &str) {}

    /// Text shown in place of the native asset.
    fn native_asset_alias(&self) -> &str {
        "native"
    }
}

/// Annotator that decorates nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl Annotate for NoAnnotations {}

/// Records help requests while decoding and expands those fields when encoding again.
#[derive(Debug, Clone, Default)]
pub struct HelpFields {
    fields: BTreeSet<String>,
    native: Option<String>,
}

impl HelpFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the native asset as `alias` (e.g. `XLM`).
    pub fn with_native_alias(mut self, alias: &str) -> Self {
        self.native = Some(alias.to_string());
        self
    }

    pub fn insert(&mut self, field: &str) {
        self.fields.insert(field.to_string());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}

impl Annotate for HelpFields {
    fn wants_help(&self, field: &str) -> bool {
        self.contains(field)
    }

    fn note_help_requested(&mut self, field: &str) {
        self.insert(field);
    }

    fn native_asset_alias(&self) -> &str {
        self.native.as_deref().unwrap_or("native")
    }
}
