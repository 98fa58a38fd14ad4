//! Entry points for converting typed trees to and from txrep text.
//!
//! [`Codec`] owns the resolved [`Schema`]; each call builds its own traversal state, so one
//! codec can serve any number of trees. Encoding collects per-field [`BadValue`]s, decoding
//! collects per-line [`LineError`]s; neither stops at the first problem.

use crate::annotate::Annotate;
use crate::ast::{Schema, SchemaError, TypeSpec};
use crate::marshal::Marshal;
use crate::render::CodeError;
use crate::scan::Scan;
use crate::value::Value;
use crate::walk;
use std::fmt;
use std::io::Read;

/// Why one line of txrep input was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    /// Line has no `:`.
    #[error("syntax error")]
    Syntax,
    #[error("{0}")]
    Parse(String),
    /// A length above the declared maximum; the value was clamped.
    #[error("{field} ({size}) exceeds maximum size {max}.")]
    Bound { field: String, size: u64, max: u32 },
    /// Well-formed value that the format does not allow in this position.
    #[error("{0}")]
    Semantic(String),
    #[error(transparent)]
    Code(#[from] CodeError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineError {
    pub line: usize,
    pub error: ScanError,
}

impl LineError {
    pub fn new(line: usize, error: ScanError) -> Self {
        LineError { line, error }
    }
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.line, self.error)
    }
}

/// All problems found while parsing one document, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxrepError(pub Vec<LineError>);

impl TxrepError {
    fn render(&self, prefix: &str) -> String {
        self.0
            .iter()
            .map(|e| format!("{}{}\n", prefix, e))
            .collect()
    }

    /// Render as `source:line: message` lines.
    pub fn file_error(&self, source: &str) -> String {
        self.render(&format!("{}:", source))
    }

    /// Lowest line number with an error (where an editor should jump).
    pub fn first_line(&self) -> Option<usize> {
        self.0.iter().map(|e| e.line).min()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineError> {
        self.0.iter()
    }
}

impl fmt::Display for TxrepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

impl std::error::Error for TxrepError {}

/// A field that could not be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct BadValue {
    pub field: String,
    pub msg: String,
}

impl fmt::Display for BadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.msg)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadValues(pub Vec<BadValue>);

impl BadValues {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadValue> {
        self.0.iter()
    }
}

impl fmt::Display for BadValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.0 {
            writeln!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl std::error::Error for BadValues {}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("{0}")]
    Txrep(#[from] TxrepError),
    #[error("{0}")]
    BadValue(#[from] BadValues),
}

/// Rendered document plus the fields that could not be rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoded {
    pub text: String,
    pub errors: BadValues,
}

impl Encoded {
    pub fn into_result(self) -> Result<String, BadValues> {
        if self.errors.is_empty() {
            Ok(self.text)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Codec {
    schema: Schema,
}

impl Codec {
    pub fn new(schema: Schema) -> Self {
        Codec { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Fresh zero-valued tree of the given type.
    pub fn default_value(&self, spec: &TypeSpec) -> Result<Value, SchemaError> {
        self.schema.default_value(spec)
    }

    /// Render `root` as txrep.
    pub fn encode(&self, root: &Value, annotate: &dyn Annotate) -> Encoded {
        self.encode_at("", root, annotate)
    }

    /// Render `root` with every field name prefixed by `name`.
    pub fn encode_at(&self, name: &str, root: &Value, annotate: &dyn Annotate) -> Encoded {
        let mut m = Marshal::new(&self.schema, annotate, root);
        m.marshal(name, root);
        m.finish()
    }

    /// Parse txrep text into `root`, in place. Fields the text does not mention keep their
    /// current values.
    pub fn decode(
        &self,
        input: &str,
        root: &mut Value,
        annotate: &mut dyn Annotate,
    ) -> Result<(), TxrepError> {
        self.decode_at(input, "", root, annotate)
    }

    pub fn decode_at(
        &self,
        input: &str,
        name: &str,
        root: &mut Value,
        annotate: &mut dyn Annotate,
    ) -> Result<(), TxrepError> {
        let mut s = Scan::new(&self.schema, input, annotate);
        s.scan(name, root);
        s.finish()
    }

    /// Read the whole input, then decode it. Read failures are reported as
    /// [`CodecError::Io`], separately from per-line errors. Invalid UTF-8 is replaced
    /// with U+FFFD, so only the affected lines fail to parse.
    pub fn decode_reader<R: Read>(
        &self,
        mut reader: R,
        root: &mut Value,
        annotate: &mut dyn Annotate,
    ) -> Result<(), CodecError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let input = String::from_utf8_lossy(&bytes);
        self.decode(&input, root, annotate)?;
        Ok(())
    }

    /// Sub-node at a dotted txrep field name, or `None` if the name does not exist, a
    /// containing optional is absent, or a union arm on the path is inactive. For an
    /// optional field the [`Value::Optional`] itself is returned.
    pub fn get_field<'v>(&self, root: &'v Value, field: &str) -> Option<&'v Value> {
        walk::get_field(&self.schema, root, field)
    }

    pub fn get_field_mut<'v>(&self, root: &'v mut Value, field: &str) -> Option<&'v mut Value> {
        walk::get_field_mut(&self.schema, root, field)
    }
}
