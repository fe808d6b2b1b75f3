//! Source positions carried by the companion symbol file.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A source location a type or member was compiled from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequencePoint {
    pub document: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl SequencePoint {
    pub fn new(document: impl Into<String>, line: u32, column: u32) -> Self {
        SequencePoint {
            document: document.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SequencePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.document, self.line, self.column)
    }
}

/// Positions keyed by `Type` or `Type::member`.
///
/// Stored next to a module file (`<file>.pdb`) and applied when the module
/// is read, so diagnostics can point at source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    pub points: BTreeMap<String, SequencePoint>,
}

impl SymbolTable {
    pub fn type_key(type_name: &str) -> String {
        type_name.to_string()
    }

    pub fn member_key(type_name: &str, member: &str) -> String {
        format!("{type_name}::{member}")
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SequencePoint> {
        self.points.get(key)
    }

    pub fn insert(&mut self, key: String, point: SequencePoint) {
        self.points.insert(key, point);
    }
}
