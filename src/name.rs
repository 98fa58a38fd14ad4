//! Dotted field names and pseudo-selectors.
//!
//! `tx.operations[0].body.paymentOp.amount` is built from the root name (usually empty),
//! struct field and union arm names joined with `.`, and `[i]` for array and sequence
//! elements. Pseudo-selectors expose structure: `name.len` for sequence lengths and
//! `name._present` (`name._inner_present`, ... for directly nested optionals) for presence.

pub const LEN: &str = "len";
pub const PRESENT: &str = "_present";
pub const INNER: &str = "_inner";

const V0_SOURCE: &str = "tx.sourceAccountEd25519";
const V0_SOURCE_FIELD: &str = "sourceAccountEd25519";
const SHORT_SOURCE_FIELD: &str = "sourceAccount";

/// `parent.field`, or just `field` at the root.
pub fn child(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}

/// `parent[i]`
pub fn index(parent: &str, i: usize) -> String {
    format!("{}[{}]", parent, i)
}

/// `name.len`
pub fn len_field(name: &str) -> String {
    child(name, LEN)
}

/// Presence pseudo-field of an optional at `depth` (1 for an optional not directly
/// inside another optional).
pub fn present_field(name: &str, depth: usize) -> String {
    let selector = format!("{}{}", INNER.repeat(depth.saturating_sub(1)), PRESENT);
    child(name, &selector)
}

/// Short name under which the 32-byte source key of a version-0 transaction is written.
pub fn v0_source_alias(name: &str) -> Option<String> {
    if !name.ends_with(V0_SOURCE) {
        return None;
    }
    name.strip_suffix(V0_SOURCE_FIELD)
        .map(|prefix| format!("{}{}", prefix, SHORT_SOURCE_FIELD))
}
