//! Engine output records

use keel_core::Position;
use serde::Serialize;

/// One positioned finding produced by the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Document path to the offending location, e.g.
    /// `["Resources", "Function", "Properties", "SnapStart"]`
    pub path: Vec<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, position: Position, path: Vec<String>) -> Self {
        Self {
            message: message.into(),
            line: position.line,
            column: position.column,
            path,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}
