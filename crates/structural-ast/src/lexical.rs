/*
 * lexical.rs
 * Copyright (c) 2025 Posit, PBC
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// A lexical position in a source file.
///
/// Positions are diagnostic metadata: they never participate in node
/// equality, and trees built programmatically (for example in tests) use
/// the default position of line 0, column 0 with no file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexical {
    /// The line number (1-indexed; 0 for positions with no source).
    pub line: u64,

    /// The column number (1-indexed; 0 for positions with no source).
    pub column: u64,

    /// The file the position refers to, if known.
    pub file: Option<String>,
}

impl Lexical {
    /// Construct a position with no file.
    pub fn new(line: u64, column: u64) -> Self {
        Self {
            line,
            column,
            file: None,
        }
    }

    /// Construct a position within a file.
    pub fn in_file(line: u64, column: u64, file: impl Into<String>) -> Self {
        Self {
            line,
            column,
            file: Some(file.into()),
        }
    }
}

impl fmt::Display for Lexical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_file() {
        let lex = Lexical::in_file(12, 4, "doc.xml");
        assert_eq!(lex.to_string(), "doc.xml:12:4");
    }

    #[test]
    fn display_without_file() {
        assert_eq!(Lexical::new(3, 9).to_string(), "3:9");
    }

    #[test]
    fn default_is_zero() {
        let lex = Lexical::default();
        assert_eq!(lex.line, 0);
        assert_eq!(lex.column, 0);
        assert!(lex.file.is_none());
    }
}
