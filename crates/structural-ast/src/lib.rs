/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * AST type definitions for structural documents.
 *
 * This crate provides pure data type definitions for the structural
 * document tree. Every node type is generic over a phase annotation: the
 * parser produces trees annotated with `Parsed` (a unit), and the compiler
 * produces trees annotated with its own per-node context type. It has
 * minimal dependencies (serde, num-bigint) and can be used by any crate
 * that needs to work with document trees.
 */

pub mod block;
pub mod inline;
pub mod lexical;
pub mod number;
pub mod table;

mod eq;

// Re-export commonly used types at the crate root
pub use block::{
    BlockId, BlockKind, Document, FormalItem, Footnote, Paragraph, Section, SectionWithContent,
    SectionWithSections, SectionWithSubsections, Subsection, SubsectionContent, TypeName,
};
pub use inline::{
    FootnoteReference, FormalItemReference, Image, ImageSize, Inline, Inlines, Link, LinkContent,
    LinkExternal, ListItem, ListOrdered, ListUnordered, Term, Text, Verbatim,
};
pub use lexical::Lexical;
pub use number::{ContentNumber, ContentNumberParseError};
pub use table::{Table, TableBody, TableCell, TableColumnName, TableHeader, TableRow};

use serde::{Deserialize, Serialize};

/// The phase annotation for freshly parsed trees.
///
/// Parsed nodes carry no per-node context beyond their lexical position;
/// the annotation is a unit value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parsed;
