/*
 * inline.rs
 * Copyright (c) 2025 Posit, PBC
 */

use crate::block::TypeName;
use crate::eq::{option_eq, slice_eq};
use crate::lexical::Lexical;
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Inline content: the closed set of node kinds that may appear inside
/// paragraphs, formal items, footnotes, list items and table cells.
///
/// Each variant wraps a struct carrying the variant's content fields, the
/// node's lexical position, and the phase annotation `A`. Consumers are
/// expected to match exhaustively; adding a variant is a breaking change
/// that the compiler surfaces at every match site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Inline<A> {
    Text(Text<A>),
    Term(Term<A>),
    Image(Image<A>),
    Link(Link<A>),
    LinkExternal(LinkExternal<A>),
    FootnoteReference(FootnoteReference<A>),
    FormalItemReference(FormalItemReference<A>),
    Verbatim(Verbatim<A>),
    ListOrdered(ListOrdered<A>),
    ListUnordered(ListUnordered<A>),
    Table(Table<A>),
}

pub type Inlines<A> = Vec<Inline<A>>;

impl<A, B> PartialEq<Inline<B>> for Inline<A> {
    fn eq(&self, other: &Inline<B>) -> bool {
        match (self, other) {
            (Inline::Text(a), Inline::Text(b)) => a == b,
            (Inline::Term(a), Inline::Term(b)) => a == b,
            (Inline::Image(a), Inline::Image(b)) => a == b,
            (Inline::Link(a), Inline::Link(b)) => a == b,
            (Inline::LinkExternal(a), Inline::LinkExternal(b)) => a == b,
            (Inline::FootnoteReference(a), Inline::FootnoteReference(b)) => a == b,
            (Inline::FormalItemReference(a), Inline::FormalItemReference(b)) => a == b,
            (Inline::Verbatim(a), Inline::Verbatim(b)) => a == b,
            (Inline::ListOrdered(a), Inline::ListOrdered(b)) => a == b,
            (Inline::ListUnordered(a), Inline::ListUnordered(b)) => a == b,
            (Inline::Table(a), Inline::Table(b)) => a == b,
            _ => false,
        }
    }
}

/// Plain inline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text<A> {
    pub data: A,
    pub lexical: Lexical,
    pub text: String,
}

impl<A, B> PartialEq<Text<B>> for Text<A> {
    fn eq(&self, other: &Text<B>) -> bool {
        self.text == other.text
    }
}

/// A defined term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub text: Vec<Text<A>>,
}

impl<A, B> PartialEq<Term<B>> for Term<A> {
    fn eq(&self, other: &Term<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.text, &other.text)
    }
}

/// An explicit image size in pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSize<A> {
    pub data: A,
    pub lexical: Lexical,
    pub width: u64,
    pub height: u64,
}

impl<A, B> PartialEq<ImageSize<B>> for ImageSize<A> {
    fn eq(&self, other: &ImageSize<B>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// An image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    /// The image source URI.
    pub source: String,
    pub size: Option<ImageSize<A>>,
    /// The image description text.
    pub text: Vec<Text<A>>,
}

impl<A, B> PartialEq<Image<B>> for Image<A> {
    fn eq(&self, other: &Image<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && self.source == other.source
            && option_eq(&self.size, &other.size)
            && slice_eq(&self.text, &other.text)
    }
}

/// The inline content permitted inside links: text and images only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LinkContent<A> {
    Text(Text<A>),
    Image(Image<A>),
}

impl<A, B> PartialEq<LinkContent<B>> for LinkContent<A> {
    fn eq(&self, other: &LinkContent<B>) -> bool {
        match (self, other) {
            (LinkContent::Text(a), LinkContent::Text(b)) => a == b,
            (LinkContent::Image(a), LinkContent::Image(b)) => a == b,
            _ => false,
        }
    }
}

/// A link to a block within the same document, by block identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    /// The target block identifier.
    pub target: String,
    pub content: Vec<LinkContent<A>>,
}

impl<A, B> PartialEq<Link<B>> for Link<A> {
    fn eq(&self, other: &Link<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && self.target == other.target
            && slice_eq(&self.content, &other.content)
    }
}

/// A link to an external resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkExternal<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    /// The target URI.
    pub target: String,
    pub content: Vec<LinkContent<A>>,
}

impl<A, B> PartialEq<LinkExternal<B>> for LinkExternal<A> {
    fn eq(&self, other: &LinkExternal<B>) -> bool {
        option_eq(&self.type_name, &other.type_name)
            && self.target == other.target
            && slice_eq(&self.content, &other.content)
    }
}

/// A reference to a footnote, by block identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootnoteReference<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub target: String,
}

impl<A, B> PartialEq<FootnoteReference<B>> for FootnoteReference<A> {
    fn eq(&self, other: &FootnoteReference<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && self.target == other.target
    }
}

/// A reference to a formal item, by block identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormalItemReference<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub target: String,
}

impl<A, B> PartialEq<FormalItemReference<B>> for FormalItemReference<A> {
    fn eq(&self, other: &FormalItemReference<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && self.target == other.target
    }
}

/// Verbatim text, rendered preformatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verbatim<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub text: Text<A>,
}

impl<A, B> PartialEq<Verbatim<B>> for Verbatim<A> {
    fn eq(&self, other: &Verbatim<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && self.text == other.text
    }
}

/// A single list item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListItem<A> {
    pub data: A,
    pub lexical: Lexical,
    pub content: Inlines<A>,
}

impl<A, B> PartialEq<ListItem<B>> for ListItem<A> {
    fn eq(&self, other: &ListItem<B>) -> bool {
        slice_eq(&self.content, &other.content)
    }
}

/// An ordered list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOrdered<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub items: Vec<ListItem<A>>,
}

impl<A, B> PartialEq<ListOrdered<B>> for ListOrdered<A> {
    fn eq(&self, other: &ListOrdered<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.items, &other.items)
    }
}

/// An unordered list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUnordered<A> {
    pub data: A,
    pub lexical: Lexical,
    pub type_name: Option<TypeName<A>>,
    pub items: Vec<ListItem<A>>,
}

impl<A, B> PartialEq<ListUnordered<B>> for ListUnordered<A> {
    fn eq(&self, other: &ListUnordered<B>) -> bool {
        option_eq(&self.type_name, &other.type_name) && slice_eq(&self.items, &other.items)
    }
}
