/*
 * block.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::eq::{arc_slice_eq, option_eq, slice_eq};
use crate::inline::Inlines;
use crate::lexical::Lexical;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The kind of a block content node.
///
/// Used by the cross-reference index for typed lookups and by renderers
/// for anchor and class naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    Document,
    Section,
    Subsection,
    Paragraph,
    FormalItem,
    Footnote,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Document => write!(f, "document"),
            BlockKind::Section => write!(f, "section"),
            BlockKind::Subsection => write!(f, "subsection"),
            BlockKind::Paragraph => write!(f, "paragraph"),
            BlockKind::FormalItem => write!(f, "formal-item"),
            BlockKind::Footnote => write!(f, "footnote"),
        }
    }
}

/// A user-supplied type tag attached to a node, surfaced as an extra CSS
/// class by renderers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeName<A> {
    pub data: A,
    pub lexical: Lexical,
    pub value: String,
}

impl<A> TypeName<A> {
    /// Whether `value` is a well-formed type name: a letter followed by
    /// letters, digits, `_`, `-` or `.`.
    pub fn is_valid(value: &str) -> bool {
        valid_name(value)
    }
}

impl<A, B> PartialEq<TypeName<B>> for TypeName<A> {
    fn eq(&self, other: &TypeName<B>) -> bool {
        self.value == other.value
    }
}

/// A user-declared, document-unique block identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockId<A> {
    pub data: A,
    pub lexical: Lexical,
    pub value: String,
}

impl<A> BlockId<A> {
    /// Whether `value` is a well-formed block identifier: a letter
    /// followed by letters, digits, `_`, `-` or `.`.
    pub fn is_valid(value: &str) -> bool {
        valid_name(value)
    }
}

impl<A, B> PartialEq<BlockId<B>> for BlockId<A> {
    fn eq(&self, other: &BlockId<B>) -> bool {
        self.value == other.value
    }
}

fn valid_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// A document: the tree root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<A> {
    pub data: A,
    pub lexical: Lexical,
    pub title: String,
    pub sections: Vec<Section<A>>,
}

impl<A, B> PartialEq<Document<B>> for Document<A> {
    fn eq(&self, other: &Document<B>) -> bool {
        self.title == other.title && slice_eq(&self.sections, &other.sections)
    }
}

/// A section, in one of three shapes: containing nested sections,
/// containing subsections, or containing subsection content directly.
///
/// The variants share ownership of their payloads so that the
/// cross-reference index can hold the same nodes the tree does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Section<A> {
    WithSections(Arc<SectionWithSections<A>>),
    WithSubsections(Arc<SectionWithSubsections<A>>),
    WithContent(Arc<SectionWithContent<A>>),
}

impl<A> Section<A> {
    pub fn data(&self) -> &A {
        match self {
            Section::WithSections(s) => &s.data,
            Section::WithSubsections(s) => &s.data,
            Section::WithContent(s) => &s.data,
        }
    }

    pub fn type_name(&self) -> Option<&TypeName<A>> {
        match self {
            Section::WithSections(s) => s.type_name.as_ref(),
            Section::WithSubsections(s) => s.type_name.as_ref(),
            Section::WithContent(s) => s.type_name.as_ref(),
        }
    }

    pub fn id(&self) -> Option<&BlockId<A>> {
        match self {
            Section::WithSections(s) => s.id.as_ref(),
            Section::WithSubsections(s) => s.id.as_ref(),
            Section::WithContent(s) => s.id.as_ref(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Section::WithSections(s) => &s.title,
            Section::WithSubsections(s) => &s.title,
            Section::WithContent(s) => &s.title,
        }
    }
}

impl<A, B> PartialEq<Section<B>> for Section<A> {
    fn eq(&self, other: &Section<B>) -> bool {
        match (self, other) {
            (Section::WithSections(a), Section::WithSections(b)) => **a == **b,
            (Section::WithSubsections(a), Section::WithSubsections(b)) => **a == **b,
            (Section::WithContent(a), Section::WithContent(b)) => **a == **b,
            _ => false,
        }
    }
}

/// A section containing nested sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionWithSections<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: Option<BlockId<A>>,
    pub title: String,
    /// Whether the section contributes a table of contents when rendered.
    pub table_of_contents: bool,
    pub sections: Vec<Section<A>>,
}

impl<A, B> PartialEq<SectionWithSections<B>> for SectionWithSections<A> {
    fn eq(&self, other: &SectionWithSections<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.id, &other.id)
            && self.title == other.title
            && self.table_of_contents == other.table_of_contents
            && slice_eq(&self.sections, &other.sections)
    }
}

/// A section containing subsections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionWithSubsections<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: Option<BlockId<A>>,
    pub title: String,
    pub table_of_contents: bool,
    pub subsections: Vec<Arc<Subsection<A>>>,
}

impl<A, B> PartialEq<SectionWithSubsections<B>> for SectionWithSubsections<A> {
    fn eq(&self, other: &SectionWithSubsections<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.id, &other.id)
            && self.title == other.title
            && self.table_of_contents == other.table_of_contents
            && arc_slice_eq(&self.subsections, &other.subsections)
    }
}

/// A section containing subsection content directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionWithContent<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: Option<BlockId<A>>,
    pub title: String,
    pub table_of_contents: bool,
    pub content: Vec<SubsectionContent<A>>,
}

impl<A, B> PartialEq<SectionWithContent<B>> for SectionWithContent<A> {
    fn eq(&self, other: &SectionWithContent<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.id, &other.id)
            && self.title == other.title
            && self.table_of_contents == other.table_of_contents
            && slice_eq(&self.content, &other.content)
    }
}

/// A subsection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsection<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: Option<BlockId<A>>,
    pub title: String,
    pub content: Vec<SubsectionContent<A>>,
}

impl<A, B> PartialEq<Subsection<B>> for Subsection<A> {
    fn eq(&self, other: &Subsection<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.id, &other.id)
            && self.title == other.title
            && slice_eq(&self.content, &other.content)
    }
}

/// The content that may appear inside subsections (and inside sections of
/// the direct-content shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubsectionContent<A> {
    Paragraph(Arc<Paragraph<A>>),
    FormalItem(Arc<FormalItem<A>>),
    Footnote(Arc<Footnote<A>>),
}

impl<A, B> PartialEq<SubsectionContent<B>> for SubsectionContent<A> {
    fn eq(&self, other: &SubsectionContent<B>) -> bool {
        match (self, other) {
            (SubsectionContent::Paragraph(a), SubsectionContent::Paragraph(b)) => **a == **b,
            (SubsectionContent::FormalItem(a), SubsectionContent::FormalItem(b)) => **a == **b,
            (SubsectionContent::Footnote(a), SubsectionContent::Footnote(b)) => **a == **b,
            _ => false,
        }
    }
}

/// A paragraph of inline content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: Option<BlockId<A>>,
    pub content: Inlines<A>,
}

impl<A, B> PartialEq<Paragraph<B>> for Paragraph<A> {
    fn eq(&self, other: &Paragraph<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.id, &other.id)
            && slice_eq(&self.content, &other.content)
    }
}

/// A formal item: a numbered, titled block (figure, listing, and so on)
/// that formal-item references can target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormalItem<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: Option<BlockId<A>>,
    pub title: String,
    pub content: Inlines<A>,
}

impl<A, B> PartialEq<FormalItem<B>> for FormalItem<A> {
    fn eq(&self, other: &FormalItem<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && option_eq(&self.id, &other.id)
            && self.title == other.title
            && slice_eq(&self.content, &other.content)
    }
}

/// A footnote. Unlike the other blocks, the identifier is required:
/// footnotes are only reachable through references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footnote<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub id: BlockId<A>,
    pub content: Inlines<A>,
}

impl<A, B> PartialEq<Footnote<B>> for Footnote<A> {
    fn eq(&self, other: &Footnote<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && self.id == other.id
            && slice_eq(&self.content, &other.content)
    }
}
