/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * XHTML rendering for compiled structural documents.
 *
 * The writer is a mechanical walk over a compiled tree: numbers, anchors
 * and cross-reference ordinals all come from the compilation phase. The
 * anchor and class naming scheme is a compatibility surface; see the
 * anchors module.
 */

pub mod anchors;
pub mod builder;
pub mod element;

pub use anchors::{anchor_for, class_for};
pub use builder::XhtmlBuilder;
pub use element::{XhtmlElement, XhtmlNode};

use structural_compiler::{CompiledDocument, GlobalContext, LookupError};
use thiserror::Error;

/// Errors raised while rendering a compiled document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A cross-reference failed to resolve. Rendering of the referencing
    /// element is aborted; the caller decides what to do with the rest.
    #[error("cross-reference lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("unable to write XHTML: {0}")]
    Io(#[from] std::io::Error),
}

/// A resolver of block identifiers to formatted `"file#anchor"` links.
pub trait LinkProvider {
    fn link_of(&self, target: &str) -> Result<String, LookupError>;
}

impl<F> LinkProvider for F
where
    F: Fn(&str) -> Result<String, LookupError>,
{
    fn link_of(&self, target: &str) -> Result<String, LookupError> {
        self(target)
    }
}

/// A link provider for single-file output: every block resolves to a
/// bare fragment (`"#anchor"`) within the same file.
pub struct SameDocumentLinks<'a> {
    global: &'a GlobalContext,
}

impl<'a> SameDocumentLinks<'a> {
    pub fn new(global: &'a GlobalContext) -> Self {
        Self { global }
    }
}

impl LinkProvider for SameDocumentLinks<'_> {
    fn link_of(&self, target: &str) -> Result<String, LookupError> {
        let block = self.global.find_block_for(target)?;
        Ok(format!(
            "#{}",
            anchor_for(block.kind(), &block.local().number)
        ))
    }
}

/// Render a compiled document to a complete XHTML page.
pub fn render(
    compiled: &CompiledDocument,
    links: &dyn LinkProvider,
) -> Result<String, RenderError> {
    let builder = XhtmlBuilder::new(&compiled.global, links);

    let head = XhtmlElement::new("head").with_child(
        XhtmlElement::new("title").with_text(compiled.document.title.clone()),
    );
    let body = XhtmlElement::new("body").with_child(builder.document(&compiled.document)?);

    let page = XhtmlElement::new("html")
        .with_attribute("xmlns", "http://www.w3.org/1999/xhtml")
        .with_child(head)
        .with_child(body);

    Ok(page.serialize()?)
}
