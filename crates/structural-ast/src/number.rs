/*
 * number.rs
 * Copyright (c) 2025 Posit, PBC
 */

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A content number: the hierarchical position of a node within a document.
///
/// A content number is a non-empty sequence of non-negative integers
/// describing the path from the document root, such as `[1, 2, 3]`, which
/// renders as `"1.2.3"`. The sequence length equals the nesting depth at
/// the point the number was assigned. Components are arbitrary-precision so
/// that no document, however large, can overflow them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentNumber {
    components: Vec<BigUint>,
}

/// The error raised when a content number cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentNumberParseError {
    #[error("content numbers must contain at least one component")]
    Empty,

    #[error("invalid content number component {component:?}")]
    InvalidComponent { component: String },
}

impl ContentNumber {
    /// Construct a content number from components.
    ///
    /// # Panics
    ///
    /// Panics if `components` is empty; content numbers are non-empty by
    /// construction.
    pub fn new(components: Vec<BigUint>) -> Self {
        assert!(
            !components.is_empty(),
            "content numbers must contain at least one component"
        );
        Self { components }
    }

    /// Parse a content number from text of the form `[0-9]+(\.[0-9]+)*`.
    pub fn parse(text: &str) -> Result<Self, ContentNumberParseError> {
        let components = text
            .split('.')
            .map(|part| {
                part.parse::<BigUint>()
                    .map_err(|_| ContentNumberParseError::InvalidComponent {
                        component: part.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if components.is_empty() {
            return Err(ContentNumberParseError::Empty);
        }
        Ok(Self { components })
    }

    /// The number components, from outermost to innermost.
    pub fn components(&self) -> &[BigUint] {
        &self.components
    }

    /// The number of components; equal to the nesting depth at assignment.
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// The innermost component.
    pub fn last(&self) -> &BigUint {
        self.components
            .last()
            .expect("content numbers are non-empty")
    }

    /// The human-readable form of this number, such as `"1.2.3"`.
    pub fn to_human_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, component) in self.components.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}
