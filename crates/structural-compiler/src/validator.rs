/*
 * validator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Structural validation rules.
//!
//! Each rule is a pure function over a parsed subtree, producing zero or
//! more errors and never aborting the surrounding traversal. The driver
//! feeds the results into the accumulating combinators, so every rule
//! violation anywhere in a document is reported in a single pass.

use crate::error::CompileError;
use structural_ast::{Inline, Parsed, TableCell, TableRow};

/// Check that a table row contains exactly the number of cells declared by
/// the table header. Rows are checked independently: a document with `N`
/// bad rows produces `N` errors.
pub fn check_row_shape(row: &TableRow<Parsed>, expected_columns: usize) -> Option<CompileError> {
    let received = row.cells.len();
    if received == expected_columns {
        return None;
    }
    Some(CompileError::error(
        row.lexical.clone(),
        format!(
            "number of columns in table row does not match the number declared in the table \
             header (expected: {} columns, received: {} columns)",
            expected_columns, received
        ),
    ))
}

/// Check that a table cell does not contain a nested table.
pub fn check_cell_content(cell: &TableCell<Parsed>) -> Vec<CompileError> {
    cell.content
        .iter()
        .filter_map(|inline| match inline {
            Inline::Table(table) => Some(CompileError::error(
                table.lexical.clone(),
                "tables cannot be nested inside table cells",
            )),
            _ => None,
        })
        .collect()
}
