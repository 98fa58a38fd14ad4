//! # txrep: editable text form for typed XDR trees
//!
//! A line-oriented `name: value` representation of XDR values (structs, unions, arrays,
//! optionals, enums, opaque blocks, scalars) that a person can read, edit and feed back.
//! Encoding and decoding are driven by a [`Schema`]; decoding accumulates every problem
//! with its line number instead of stopping at the first one.
//!
//! ## Text format
//!
//! - One field per line, in declaration order: `tx.fee: 100`
//! - Struct fields and union arms joined with `.`, elements as `[i]`
//! - Pseudo-fields: `name.len` for sequences, `name._present` for optionals
//!   (`name._inner_present` for an optional directly inside another)
//! - Anything after the first token of a value is commentary, so adornments such as
//!   `10000000 (1e7)` or date comments are ignored when reading
//! - A value ending in `?` asks for help: enum fields list their symbols on the next render
//!
//! ## Example document
//!
//! ```text
//! type: ENVELOPE_TYPE_TX
//! tx.sourceAccount: GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF
//! tx.fee: 100
//! tx.seqNum: 1
//! tx.timeBounds._present: false
//! tx.memo.type: MEMO_TEXT
//! tx.memo.text: "hello"
//! tx.operations.len: 1
//! tx.operations[0].sourceAccount._present: false
//! tx.operations[0].body.type: INFLATION
//! tx.ext.v: 0
//! signatures.len: 0
//! ```
//!
//! ## Usage
//!
//! See [`transaction::codec`] for the Stellar envelope schema and `tests/txrep.rs` for
//! round trips, help requests and error reporting.

pub mod annotate;
pub mod ast;
pub mod codec;
pub mod name;
pub mod parser;
pub mod render;
pub mod stellar;
pub mod strkey;
pub mod transaction;
pub mod value;
pub mod walk;

mod marshal;
mod scan;

pub use annotate::{Annotate, HelpFields, NoAnnotations};
pub use ast::{Definitions, Schema, SchemaError, TypeSpec};
pub use codec::{
    BadValue, BadValues, Codec, CodecError, Encoded, LineError, ScanError, TxrepError,
};
pub use marshal::AMOUNT_EXP;
pub use value::Value;
