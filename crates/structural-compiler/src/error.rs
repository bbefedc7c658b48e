/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for document compilation and cross-reference lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use structural_ast::{BlockKind, Lexical};
use thiserror::Error;

/// The severity of a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A structural validation failure discovered during compilation.
///
/// Compile errors are accumulated: the driver records every error found
/// anywhere in the tree and keeps going, so a single compilation reports
/// all of them at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileError {
    pub severity: Severity,
    pub lexical: Lexical,
    pub message: String,
}

impl CompileError {
    /// An error-severity compile error.
    pub fn error(lexical: Lexical, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            lexical,
            message: message.into(),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.lexical, self.severity, self.message)
    }
}

impl std::error::Error for CompileError {}

/// Errors raised by the cross-reference index at query time.
///
/// Lookups typically run during rendering, well after compilation has
/// succeeded. The index cannot recover from a failed lookup itself; the
/// caller stops processing the referencing element and reports the error.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LookupError {
    /// No block is registered under the identifier.
    #[error("no block exists with the identifier {id:?}")]
    NotFound { id: String },

    /// A block exists but is of the wrong kind.
    #[error(
        "block {id:?} does not have the expected type (expected: {expected}, received: {received})"
    )]
    TypeMismatch {
        id: String,
        expected: BlockKind,
        received: BlockKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_display_cites_position() {
        let error = CompileError::error(Lexical::in_file(4, 2, "doc.xml"), "bad table");
        assert_eq!(error.to_string(), "doc.xml:4:2: error: bad table");
    }

    #[test]
    fn type_mismatch_names_both_kinds() {
        let error = LookupError::TypeMismatch {
            id: "intro".to_string(),
            expected: BlockKind::Paragraph,
            received: BlockKind::Section,
        };
        let text = error.to_string();
        assert!(text.contains("paragraph"));
        assert!(text.contains("section"));
    }
}
