/*
 * table.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::block::TypeName;
use crate::eq::{option_eq, slice_eq};
use crate::inline::Inlines;
use crate::lexical::Lexical;
use serde::{Deserialize, Serialize};

/// A table: an optional header naming the columns, and a body of rows.
///
/// When a header is present, every row must contain exactly as many cells
/// as the header has column names; the compiler's structural validator
/// reports one error per non-conforming row. Tables may not nest inside
/// table cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub header: Option<TableHeader<A>>,
    pub body: TableBody<A>,
}

impl<A, B> PartialEq<Table<B>> for Table<A> {
    fn eq(&self, other: &Table<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.header, &other.header)
            && self.body == other.body
    }
}

/// A table header: the ordered column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableHeader<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub names: Vec<TableColumnName<A>>,
}

impl<A, B> PartialEq<TableHeader<B>> for TableHeader<A> {
    fn eq(&self, other: &TableHeader<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.names, &other.names)
    }
}

/// A single column name within a table header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumnName<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub name: String,
}

impl<A, B> PartialEq<TableColumnName<B>> for TableColumnName<A> {
    fn eq(&self, other: &TableColumnName<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && self.name == other.name
    }
}

/// A table body: the ordered rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableBody<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub rows: Vec<TableRow<A>>,
}

impl<A, B> PartialEq<TableBody<B>> for TableBody<A> {
    fn eq(&self, other: &TableBody<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.rows, &other.rows)
    }
}

/// A table row: the ordered cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub cells: Vec<TableCell<A>>,
}

impl<A, B> PartialEq<TableRow<B>> for TableRow<A> {
    fn eq(&self, other: &TableRow<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.cells, &other.cells)
    }
}

/// A table cell holding inline content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub content: Inlines<A>,
}

impl<A, B> PartialEq<TableCell<B>> for TableCell<A> {
    fn eq(&self, other: &TableCell<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.content, &other.content)
    }
}
