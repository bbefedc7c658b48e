//! Error types for XML parsing with source locations.

use serde::{Deserialize, Serialize};
use std::fmt;
use structural_ast::Lexical;

/// The severity of a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// A recoverable oddity; parsing continues and may still succeed.
    Warning,

    /// A malformed construct; parsing continues to find further errors,
    /// but no tree is produced.
    Error,

    /// An unrecoverable failure such as malformed XML syntax.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal"),
        }
    }
}

/// An error produced while parsing a document from XML.
///
/// Parse errors accumulate: the reader records every problem it can find
/// in one pass and returns them together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub severity: Severity,
    pub lexical: Lexical,
    pub message: String,
}

impl ParseError {
    pub fn error(lexical: Lexical, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            lexical,
            message: message.into(),
        }
    }

    pub fn fatal(lexical: Lexical, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            lexical,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.lexical, self.severity, self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_cites_position_and_severity() {
        let error = ParseError::error(Lexical::in_file(7, 3, "doc.xml"), "unexpected element");
        assert_eq!(error.to_string(), "doc.xml:7:3: error: unexpected element");
    }

    #[test]
    fn severities_are_ordered() {
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }
}
