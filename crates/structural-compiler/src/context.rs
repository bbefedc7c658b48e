/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Per-node and per-document compilation context.
//!
//! Every compiled node carries a [`CompiledLocal`]: its identity, content
//! number, and a handle to its parent. The [`GlobalContext`] is the
//! per-document cross-reference index: block identifiers and footnote
//! ordering, built by the driver during its single traversal and frozen
//! read-only when the compile task returns. Parent and registry references
//! are identity handles or shared nodes rather than owning back-pointers,
//! so the compiled tree stays acyclic.

use crate::error::{CompileError, LookupError};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use structural_ast::{
    BlockId, BlockKind, ContentNumber, Document, FormalItem, Footnote, Paragraph, Parsed, Section,
    Subsection,
};

/// The identity of a compiled node, assigned in document order as the
/// driver enters each node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// The compiled phase annotation: the per-node local context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledLocal {
    /// This node's identity.
    pub node: NodeId,

    /// The content number assigned to this node.
    pub number: ContentNumber,

    /// The node whose child sequence directly contains this node; absent
    /// only for the document root.
    pub parent: Option<NodeId>,
}

/// A shared handle to a compiled block registered in the index.
#[derive(Debug, Clone)]
pub enum BlockRef {
    Section(Section<CompiledLocal>),
    Subsection(Arc<Subsection<CompiledLocal>>),
    Paragraph(Arc<Paragraph<CompiledLocal>>),
    FormalItem(Arc<FormalItem<CompiledLocal>>),
    Footnote(Arc<Footnote<CompiledLocal>>),
}

impl BlockRef {
    /// The kind of the referenced block.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockRef::Section(_) => BlockKind::Section,
            BlockRef::Subsection(_) => BlockKind::Subsection,
            BlockRef::Paragraph(_) => BlockKind::Paragraph,
            BlockRef::FormalItem(_) => BlockKind::FormalItem,
            BlockRef::Footnote(_) => BlockKind::Footnote,
        }
    }

    /// The local context of the referenced block.
    pub fn local(&self) -> &CompiledLocal {
        match self {
            BlockRef::Section(section) => section.data(),
            BlockRef::Subsection(subsection) => &subsection.data,
            BlockRef::Paragraph(paragraph) => &paragraph.data,
            BlockRef::FormalItem(formal) => &formal.data,
            BlockRef::Footnote(footnote) => &footnote.data,
        }
    }
}

/// The compiled context global to one document: the identifier index and
/// the footnote ordering.
///
/// One global context exists per compile task; it is owned by the
/// [`CompiledDocument`] and shared read-only from there. The driver never
/// queries it — it is a byproduct of compilation consumed by renderers.
#[derive(Debug, Default)]
pub struct GlobalContext {
    blocks: HashMap<String, BlockRef>,
    footnotes: Vec<Arc<Footnote<CompiledLocal>>>,
}

impl GlobalContext {
    /// Find the block registered under the given identifier.
    pub fn find_block_for(&self, id: &str) -> Result<&BlockRef, LookupError> {
        self.blocks.get(id).ok_or_else(|| LookupError::NotFound {
            id: id.to_string(),
        })
    }

    /// Find the section with the given identifier.
    pub fn find_section_for(&self, id: &str) -> Result<&Section<CompiledLocal>, LookupError> {
        match self.find_block_for(id)? {
            BlockRef::Section(section) => Ok(section),
            other => Err(type_mismatch(id, BlockKind::Section, other)),
        }
    }

    /// Find the subsection with the given identifier.
    pub fn find_subsection_for(
        &self,
        id: &str,
    ) -> Result<&Arc<Subsection<CompiledLocal>>, LookupError> {
        match self.find_block_for(id)? {
            BlockRef::Subsection(subsection) => Ok(subsection),
            other => Err(type_mismatch(id, BlockKind::Subsection, other)),
        }
    }

    /// Find the paragraph with the given identifier.
    pub fn find_paragraph_for(
        &self,
        id: &str,
    ) -> Result<&Arc<Paragraph<CompiledLocal>>, LookupError> {
        match self.find_block_for(id)? {
            BlockRef::Paragraph(paragraph) => Ok(paragraph),
            other => Err(type_mismatch(id, BlockKind::Paragraph, other)),
        }
    }

    /// Find the formal item with the given identifier.
    pub fn find_formal_item_for(
        &self,
        id: &str,
    ) -> Result<&Arc<FormalItem<CompiledLocal>>, LookupError> {
        match self.find_block_for(id)? {
            BlockRef::FormalItem(formal) => Ok(formal),
            other => Err(type_mismatch(id, BlockKind::FormalItem, other)),
        }
    }

    /// Find the footnote with the given identifier.
    pub fn find_footnote_for(
        &self,
        id: &str,
    ) -> Result<&Arc<Footnote<CompiledLocal>>, LookupError> {
        match self.find_block_for(id)? {
            BlockRef::Footnote(footnote) => Ok(footnote),
            other => Err(type_mismatch(id, BlockKind::Footnote, other)),
        }
    }

    /// The 1-based, document-order ordinal of the given footnote.
    pub fn footnote_index_of(
        &self,
        footnote: &Footnote<CompiledLocal>,
    ) -> Result<BigUint, LookupError> {
        self.footnotes
            .iter()
            .position(|candidate| candidate.data.node == footnote.data.node)
            .map(|index| BigUint::from(index + 1))
            .ok_or_else(|| LookupError::NotFound {
                id: footnote.id.value.clone(),
            })
    }

    /// All footnotes, in document order.
    pub fn footnotes(&self) -> &[Arc<Footnote<CompiledLocal>>] {
        &self.footnotes
    }
}

fn type_mismatch(id: &str, expected: BlockKind, received: &BlockRef) -> LookupError {
    LookupError::TypeMismatch {
        id: id.to_string(),
        expected,
        received: received.kind(),
    }
}

/// The mutable registries owned by the driver during one traversal.
///
/// Identifiers are reserved at node entry (document order) so that the
/// first declaration wins, and the compiled block is filled in when the
/// node is assembled. Freezing produces the read-only [`GlobalContext`].
#[derive(Debug, Default)]
pub(crate) struct GlobalContextBuilder {
    reserved: HashMap<String, NodeId>,
    blocks: HashMap<String, BlockRef>,
    footnotes: Vec<Arc<Footnote<CompiledLocal>>>,
}

impl GlobalContextBuilder {
    /// Reserve an identifier for the node that declares it. Returns an
    /// error when the identifier was already declared by an earlier node;
    /// the earlier declaration keeps the identifier.
    pub(crate) fn reserve(&mut self, id: &BlockId<Parsed>, node: NodeId) -> Option<CompileError> {
        if self.reserved.contains_key(&id.value) {
            return Some(CompileError::error(
                id.lexical.clone(),
                format!(
                    "the block identifier {:?} has already been declared",
                    id.value
                ),
            ));
        }
        self.reserved.insert(id.value.clone(), node);
        None
    }

    /// Fill in the compiled block for an identifier previously reserved by
    /// `node`. A losing duplicate declaration is silently skipped; the
    /// compile has already failed with an error at the duplicate site.
    pub(crate) fn register(&mut self, id: &str, node: NodeId, block: BlockRef) {
        if self.reserved.get(id) == Some(&node) {
            self.blocks.insert(id.to_string(), block);
        }
    }

    /// Append a footnote, in document order.
    pub(crate) fn add_footnote(&mut self, footnote: Arc<Footnote<CompiledLocal>>) {
        self.footnotes.push(footnote);
    }

    /// Freeze the registries into the read-only global context.
    pub(crate) fn freeze(self) -> GlobalContext {
        GlobalContext {
            blocks: self.blocks,
            footnotes: self.footnotes,
        }
    }
}

/// The result of a successful compile task: the compiled tree together
/// with the global context it produced. Both are immutable from here on.
#[derive(Debug)]
pub struct CompiledDocument {
    pub document: Document<CompiledLocal>,
    pub global: GlobalContext,
}
