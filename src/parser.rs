//! Split txrep text into a table of `name -> (line, raw value)` using PEST.

use crate::codec::{LineError, ScanError};
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::collections::BTreeMap;
use std::ops::Bound;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct LineParser;

/// Raw value of one field and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineVal {
    pub line: usize,
    pub val: String,
}

/// Fields of a document not yet consumed by the decoder.
#[derive(Debug, Clone, Default)]
pub struct LineTable {
    entries: BTreeMap<String, LineVal>,
}

impl LineTable {
    pub fn get(&self, name: &str) -> Option<&LineVal> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove a field once the decoder has used it.
    pub fn take(&mut self, name: &str) -> Option<LineVal> {
        self.entries.remove(name)
    }

    /// Whether any remaining field name starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(prefix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Split one line into its trimmed field name and raw value; `None` if there is no colon.
pub fn parse_line(line: &str) -> Option<(&str, &str)> {
    let entry = LineParser::parse(Rule::entry, line).ok()?.next()?;
    let mut name = "";
    let mut val = "";
    for part in entry.into_inner() {
        match part.as_rule() {
            Rule::field_name => name = part.as_str(),
            Rule::value => val = part.as_str(),
            _ => {}
        }
    }
    Some((name.trim(), val))
}

/// Build the field table for a whole document. Blank lines are skipped, lines without a
/// colon are reported, and a repeated name keeps its last occurrence.
pub fn read_table(input: &str) -> (LineTable, Vec<LineError>) {
    let mut table = LineTable::default();
    let mut errors = Vec::new();
    for (i, raw) in input.split('\n').enumerate() {
        let line_no = i + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some((name, val)) => {
                table.entries.insert(
                    name.to_string(),
                    LineVal {
                        line: line_no,
                        val: val.to_string(),
                    },
                );
            }
            None => errors.push(LineError::new(line_no, ScanError::Syntax)),
        }
    }
    tracing::trace!(fields = table.len(), syntax_errors = errors.len(), "read txrep table");
    (table, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_colon() {
        assert_eq!(
            parse_line("tx.operations[0].body.paymentOp.asset: USD:GABC"),
            Some(("tx.operations[0].body.paymentOp.asset", " USD:GABC"))
        );
        assert_eq!(parse_line("no colon here"), None);
        assert_eq!(parse_line(":"), Some(("", "")));
    }

    #[test]
    fn last_duplicate_wins_and_syntax_errors_are_counted() {
        let (table, errors) = read_table("a: 1\r\n\nbogus\na: 2\n  \n b : 3\n");
        assert_eq!(errors, vec![LineError::new(3, ScanError::Syntax)]);
        assert_eq!(table.get("a"), Some(&LineVal { line: 4, val: " 2".to_string() }));
        assert_eq!(table.get("b").map(|lv| lv.line), Some(6));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn prefix_lookup() {
        let (mut table, _) = read_table("x.y._present: true\nxz: 1\n");
        assert!(table.has_prefix("x."));
        assert!(!table.has_prefix("y."));
        table.take("x.y._present");
        assert!(!table.has_prefix("x."));
        assert!(table.has_prefix("x"));
    }
}
