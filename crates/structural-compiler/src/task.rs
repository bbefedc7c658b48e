/*
 * task.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The compilation driver.
//!
//! A single depth-first, document-order traversal rebuilds the parsed tree
//! into its compiled form: every node receives a content number from the
//! numbering engine and a local context linking it to its parent, declared
//! identifiers and footnotes are registered into the global context, and
//! structural rules run as nodes are visited. Failures accumulate; the
//! traversal never stops at the first error.

use crate::accumulate::{Accumulate, combine, sequence, with_local_errors};
use crate::context::{BlockRef, CompiledDocument, CompiledLocal, GlobalContextBuilder, NodeId};
use crate::error::CompileError;
use crate::numbering::ContentNumbering;
use crate::validator;
use std::sync::Arc;
use structural_ast::{
    BlockId, Document, FootnoteReference, FormalItem, FormalItemReference, Image, ImageSize,
    Inline, Link, LinkContent, LinkExternal, ListItem, ListOrdered, ListUnordered, Paragraph,
    Parsed, Section, SectionWithContent, SectionWithSections, SectionWithSubsections, Subsection,
    SubsectionContent, Table, TableBody, TableCell, TableColumnName, TableHeader, TableRow, Term,
    Text, TypeName, Verbatim,
};
use structural_ast::Footnote;

/// Compile a parsed document.
///
/// Returns the compiled document and its global context, or the complete,
/// ordered list of every compile error found anywhere in the tree. The
/// error list is never empty on failure.
pub fn compile(document: &Document<Parsed>) -> Result<CompiledDocument, Vec<CompileError>> {
    CompilationTask::new(document).run()
}

struct CompilationTask<'a> {
    document: &'a Document<Parsed>,
    numbering: ContentNumbering,
    global: GlobalContextBuilder,
    next_node: u64,
}

impl<'a> CompilationTask<'a> {
    fn new(document: &'a Document<Parsed>) -> Self {
        Self {
            document,
            numbering: ContentNumbering::new(),
            global: GlobalContextBuilder::default(),
            next_node: 0,
        }
    }

    fn run(mut self) -> Result<CompiledDocument, Vec<CompileError>> {
        tracing::debug!(title = %self.document.title, "compiling document");

        let document = self.document;
        let root = self.fresh_node();
        let local = CompiledLocal {
            node: root,
            number: self.numbering.current(),
            parent: None,
        };

        let sections = sequence(
            document
                .sections
                .iter()
                .map(|section| self.compile_section(section, root)),
        );

        // The traversal must leave the engine exactly as it found it; an
        // unbalanced push/pop is a driver defect.
        assert_eq!(self.numbering.depth(), 1, "numbering stack must be empty");

        let sections = sections?;
        tracing::debug!(nodes = self.next_node, "document compiled");

        Ok(CompiledDocument {
            document: Document {
                data: local,
                lexical: document.lexical.clone(),
                title: document.title.clone(),
                sections,
            },
            global: self.global.freeze(),
        })
    }

    fn fresh_node(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }

    /// Number the next sibling at the current depth and hand it an
    /// identity and a parent handle.
    fn new_local(&mut self, parent: NodeId) -> CompiledLocal {
        self.numbering.increment();
        CompiledLocal {
            node: self.fresh_node(),
            number: self.numbering.current(),
            parent: Some(parent),
        }
    }

    fn compile_section(
        &mut self,
        section: &Section<Parsed>,
        parent: NodeId,
    ) -> Accumulate<Section<CompiledLocal>> {
        let local = self.new_local(parent);

        let mut local_errors = Vec::new();
        if let Some(id) = section.id()
            && let Some(error) = self.global.reserve(id, local.node)
        {
            local_errors.push(error);
        }

        self.numbering.push();
        let result = match section {
            Section::WithSections(section) => self.compile_section_with_sections(section, &local),
            Section::WithSubsections(section) => {
                self.compile_section_with_subsections(section, &local)
            }
            Section::WithContent(section) => self.compile_section_with_content(section, &local),
        };
        self.numbering.pop();

        let result = with_local_errors(local_errors, result);
        if let Ok(section) = &result
            && let Some(id) = section.id()
        {
            let id = id.value.clone();
            self.global
                .register(&id, local.node, BlockRef::Section(section.clone()));
        }
        result
    }

    fn compile_section_with_sections(
        &mut self,
        section: &SectionWithSections<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Section<CompiledLocal>> {
        let sections = sequence(
            section
                .sections
                .iter()
                .map(|child| self.compile_section(child, local.node)),
        )?;

        Ok(Section::WithSections(Arc::new(SectionWithSections {
            data: local.clone(),
            lexical: section.lexical.clone(),
            type_name: self.compile_type_name_opt(&section.type_name, local),
            id: self.compile_block_id_opt(&section.id, local),
            title: section.title.clone(),
            table_of_contents: section.table_of_contents,
            sections,
        })))
    }

    fn compile_section_with_subsections(
        &mut self,
        section: &SectionWithSubsections<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Section<CompiledLocal>> {
        let subsections = sequence(
            section
                .subsections
                .iter()
                .map(|child| self.compile_subsection(child, local.node)),
        )?;

        Ok(Section::WithSubsections(Arc::new(SectionWithSubsections {
            data: local.clone(),
            lexical: section.lexical.clone(),
            type_name: self.compile_type_name_opt(&section.type_name, local),
            id: self.compile_block_id_opt(&section.id, local),
            title: section.title.clone(),
            table_of_contents: section.table_of_contents,
            subsections,
        })))
    }

    fn compile_section_with_content(
        &mut self,
        section: &SectionWithContent<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Section<CompiledLocal>> {
        let content = sequence(
            section
                .content
                .iter()
                .map(|child| self.compile_subsection_content(child, local.node)),
        )?;

        Ok(Section::WithContent(Arc::new(SectionWithContent {
            data: local.clone(),
            lexical: section.lexical.clone(),
            type_name: self.compile_type_name_opt(&section.type_name, local),
            id: self.compile_block_id_opt(&section.id, local),
            title: section.title.clone(),
            table_of_contents: section.table_of_contents,
            content,
        })))
    }

    fn compile_subsection(
        &mut self,
        subsection: &Subsection<Parsed>,
        parent: NodeId,
    ) -> Accumulate<Arc<Subsection<CompiledLocal>>> {
        let local = self.new_local(parent);

        let mut local_errors = Vec::new();
        if let Some(id) = &subsection.id
            && let Some(error) = self.global.reserve(id, local.node)
        {
            local_errors.push(error);
        }

        self.numbering.push();
        let content = sequence(
            subsection
                .content
                .iter()
                .map(|child| self.compile_subsection_content(child, local.node)),
        );
        self.numbering.pop();

        let result = with_local_errors(local_errors, content).map(|content| {
            Arc::new(Subsection {
                data: local.clone(),
                lexical: subsection.lexical.clone(),
                type_name: self.compile_type_name_opt(&subsection.type_name, &local),
                id: self.compile_block_id_opt(&subsection.id, &local),
                title: subsection.title.clone(),
                content,
            })
        });

        if let Ok(subsection) = &result
            && let Some(id) = &subsection.id
        {
            let id = id.value.clone();
            self.global
                .register(&id, local.node, BlockRef::Subsection(subsection.clone()));
        }
        result
    }

    fn compile_subsection_content(
        &mut self,
        content: &SubsectionContent<Parsed>,
        parent: NodeId,
    ) -> Accumulate<SubsectionContent<CompiledLocal>> {
        let local = self.new_local(parent);

        let mut local_errors = Vec::new();
        let declared_id = match content {
            SubsectionContent::Paragraph(paragraph) => paragraph.id.as_ref(),
            SubsectionContent::FormalItem(formal) => formal.id.as_ref(),
            SubsectionContent::Footnote(footnote) => Some(&footnote.id),
        };
        if let Some(id) = declared_id
            && let Some(error) = self.global.reserve(id, local.node)
        {
            local_errors.push(error);
        }

        self.numbering.push();
        let result = match content {
            SubsectionContent::Paragraph(paragraph) => self
                .compile_paragraph(paragraph, &local)
                .map(SubsectionContent::Paragraph),
            SubsectionContent::FormalItem(formal) => self
                .compile_formal_item(formal, &local)
                .map(SubsectionContent::FormalItem),
            SubsectionContent::Footnote(footnote) => self
                .compile_footnote(footnote, &local)
                .map(SubsectionContent::Footnote),
        };
        self.numbering.pop();

        let result = with_local_errors(local_errors, result);
        if let Ok(content) = &result {
            match content {
                SubsectionContent::Paragraph(paragraph) => {
                    if let Some(id) = &paragraph.id {
                        let id = id.value.clone();
                        self.global.register(
                            &id,
                            local.node,
                            BlockRef::Paragraph(paragraph.clone()),
                        );
                    }
                }
                SubsectionContent::FormalItem(formal) => {
                    if let Some(id) = &formal.id {
                        let id = id.value.clone();
                        self.global
                            .register(&id, local.node, BlockRef::FormalItem(formal.clone()));
                    }
                }
                SubsectionContent::Footnote(footnote) => {
                    let id = footnote.id.value.clone();
                    self.global
                        .register(&id, local.node, BlockRef::Footnote(footnote.clone()));
                    self.global.add_footnote(footnote.clone());
                }
            }
        }
        result
    }

    fn compile_paragraph(
        &mut self,
        paragraph: &Paragraph<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Arc<Paragraph<CompiledLocal>>> {
        let content = sequence(
            paragraph
                .content
                .iter()
                .map(|inline| self.compile_inline(inline, local.node)),
        )?;

        Ok(Arc::new(Paragraph {
            data: local.clone(),
            lexical: paragraph.lexical.clone(),
            type_name: self.compile_type_name_opt(&paragraph.type_name, local),
            id: self.compile_block_id_opt(&paragraph.id, local),
            content,
        }))
    }

    fn compile_formal_item(
        &mut self,
        formal: &FormalItem<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Arc<FormalItem<CompiledLocal>>> {
        let content = sequence(
            formal
                .content
                .iter()
                .map(|inline| self.compile_inline(inline, local.node)),
        )?;

        Ok(Arc::new(FormalItem {
            data: local.clone(),
            lexical: formal.lexical.clone(),
            type_name: self.compile_type_name_opt(&formal.type_name, local),
            id: self.compile_block_id_opt(&formal.id, local),
            title: formal.title.clone(),
            content,
        }))
    }

    fn compile_footnote(
        &mut self,
        footnote: &Footnote<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Arc<Footnote<CompiledLocal>>> {
        let content = sequence(
            footnote
                .content
                .iter()
                .map(|inline| self.compile_inline(inline, local.node)),
        )?;

        Ok(Arc::new(Footnote {
            data: local.clone(),
            lexical: footnote.lexical.clone(),
            type_name: self.compile_type_name_opt(&footnote.type_name, local),
            id: self.compile_block_id(&footnote.id, local),
            content,
        }))
    }

    fn compile_inline(
        &mut self,
        inline: &Inline<Parsed>,
        parent: NodeId,
    ) -> Accumulate<Inline<CompiledLocal>> {
        let local = self.new_local(parent);

        self.numbering.push();
        let result = match inline {
            Inline::Text(text) => Ok(Inline::Text(self.compile_text_with(text, &local))),
            Inline::Term(term) => Ok(Inline::Term(self.compile_term(term, &local))),
            Inline::Image(image) => Ok(Inline::Image(self.compile_image(image, &local))),
            Inline::Link(link) => Ok(Inline::Link(self.compile_link(link, &local))),
            Inline::LinkExternal(link) => {
                Ok(Inline::LinkExternal(self.compile_link_external(link, &local)))
            }
            Inline::FootnoteReference(reference) => Ok(Inline::FootnoteReference(
                self.compile_footnote_reference(reference, &local),
            )),
            Inline::FormalItemReference(reference) => Ok(Inline::FormalItemReference(
                self.compile_formal_item_reference(reference, &local),
            )),
            Inline::Verbatim(verbatim) => {
                Ok(Inline::Verbatim(self.compile_verbatim(verbatim, &local)))
            }
            Inline::ListOrdered(list) => {
                self.compile_list_ordered(list, &local).map(Inline::ListOrdered)
            }
            Inline::ListUnordered(list) => self
                .compile_list_unordered(list, &local)
                .map(Inline::ListUnordered),
            Inline::Table(table) => self.compile_table(table, &local).map(Inline::Table),
        };
        self.numbering.pop();
        result
    }

    fn compile_term(&mut self, term: &Term<Parsed>, local: &CompiledLocal) -> Term<CompiledLocal> {
        Term {
            data: local.clone(),
            lexical: term.lexical.clone(),
            type_name: self.compile_type_name_opt(&term.type_name, local),
            text: term
                .text
                .iter()
                .map(|text| self.compile_text(text, local.node))
                .collect(),
        }
    }

    fn compile_image(
        &mut self,
        image: &Image<Parsed>,
        local: &CompiledLocal,
    ) -> Image<CompiledLocal> {
        let size = image.size.as_ref().map(|size| {
            let size_local = self.new_local(local.node);
            ImageSize {
                data: size_local,
                lexical: size.lexical.clone(),
                width: size.width,
                height: size.height,
            }
        });

        Image {
            data: local.clone(),
            lexical: image.lexical.clone(),
            type_name: self.compile_type_name_opt(&image.type_name, local),
            source: image.source.clone(),
            size,
            text: image
                .text
                .iter()
                .map(|text| self.compile_text(text, local.node))
                .collect(),
        }
    }

    fn compile_link(&mut self, link: &Link<Parsed>, local: &CompiledLocal) -> Link<CompiledLocal> {
        Link {
            data: local.clone(),
            lexical: link.lexical.clone(),
            type_name: self.compile_type_name_opt(&link.type_name, local),
            target: link.target.clone(),
            content: link
                .content
                .iter()
                .map(|content| self.compile_link_content(content, local.node))
                .collect(),
        }
    }

    fn compile_link_external(
        &mut self,
        link: &LinkExternal<Parsed>,
        local: &CompiledLocal,
    ) -> LinkExternal<CompiledLocal> {
        LinkExternal {
            data: local.clone(),
            lexical: link.lexical.clone(),
            type_name: self.compile_type_name_opt(&link.type_name, local),
            target: link.target.clone(),
            content: link
                .content
                .iter()
                .map(|content| self.compile_link_content(content, local.node))
                .collect(),
        }
    }

    fn compile_link_content(
        &mut self,
        content: &LinkContent<Parsed>,
        parent: NodeId,
    ) -> LinkContent<CompiledLocal> {
        let local = self.new_local(parent);

        self.numbering.push();
        let result = match content {
            LinkContent::Text(text) => LinkContent::Text(self.compile_text_with(text, &local)),
            LinkContent::Image(image) => LinkContent::Image(self.compile_image(image, &local)),
        };
        self.numbering.pop();
        result
    }

    fn compile_footnote_reference(
        &mut self,
        reference: &FootnoteReference<Parsed>,
        local: &CompiledLocal,
    ) -> FootnoteReference<CompiledLocal> {
        FootnoteReference {
            data: local.clone(),
            lexical: reference.lexical.clone(),
            type_name: self.compile_type_name_opt(&reference.type_name, local),
            target: reference.target.clone(),
        }
    }

    fn compile_formal_item_reference(
        &mut self,
        reference: &FormalItemReference<Parsed>,
        local: &CompiledLocal,
    ) -> FormalItemReference<CompiledLocal> {
        FormalItemReference {
            data: local.clone(),
            lexical: reference.lexical.clone(),
            type_name: self.compile_type_name_opt(&reference.type_name, local),
            target: reference.target.clone(),
        }
    }

    fn compile_verbatim(
        &mut self,
        verbatim: &Verbatim<Parsed>,
        local: &CompiledLocal,
    ) -> Verbatim<CompiledLocal> {
        Verbatim {
            data: local.clone(),
            lexical: verbatim.lexical.clone(),
            type_name: self.compile_type_name_opt(&verbatim.type_name, local),
            text: self.compile_text(&verbatim.text, local.node),
        }
    }

    fn compile_list_ordered(
        &mut self,
        list: &ListOrdered<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<ListOrdered<CompiledLocal>> {
        let items = sequence(
            list.items
                .iter()
                .map(|item| self.compile_list_item(item, local.node)),
        )?;

        Ok(ListOrdered {
            data: local.clone(),
            lexical: list.lexical.clone(),
            type_name: self.compile_type_name_opt(&list.type_name, local),
            items,
        })
    }

    fn compile_list_unordered(
        &mut self,
        list: &ListUnordered<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<ListUnordered<CompiledLocal>> {
        let items = sequence(
            list.items
                .iter()
                .map(|item| self.compile_list_item(item, local.node)),
        )?;

        Ok(ListUnordered {
            data: local.clone(),
            lexical: list.lexical.clone(),
            type_name: self.compile_type_name_opt(&list.type_name, local),
            items,
        })
    }

    fn compile_list_item(
        &mut self,
        item: &ListItem<Parsed>,
        parent: NodeId,
    ) -> Accumulate<ListItem<CompiledLocal>> {
        let local = self.new_local(parent);
        let content = sequence(
            item.content
                .iter()
                .map(|inline| self.compile_inline(inline, local.node)),
        )?;

        Ok(ListItem {
            data: local,
            lexical: item.lexical.clone(),
            content,
        })
    }

    fn compile_table(
        &mut self,
        table: &Table<Parsed>,
        local: &CompiledLocal,
    ) -> Accumulate<Table<CompiledLocal>> {
        let expected_columns = table.header.as_ref().map(|header| header.names.len());

        let header = match &table.header {
            Some(header) => self.compile_table_header(header, local.node).map(Some),
            None => Ok(None),
        };
        let body = self.compile_table_body(&table.body, expected_columns, local.node);

        let data = local.clone();
        let lexical = table.lexical.clone();
        let type_name = self.compile_type_name_opt(&table.type_name, local);
        combine(header, body, |header, body| Table {
            data,
            lexical,
            type_name,
            header,
            body,
        })
    }

    fn compile_table_header(
        &mut self,
        header: &TableHeader<Parsed>,
        parent: NodeId,
    ) -> Accumulate<TableHeader<CompiledLocal>> {
        let local = self.new_local(parent);

        self.numbering.push();
        let names = header
            .names
            .iter()
            .map(|name| {
                let name_local = self.new_local(local.node);
                TableColumnName {
                    data: name_local.clone(),
                    lexical: name.lexical.clone(),
                    type_name: self.compile_type_name_opt(&name.type_name, &name_local),
                    name: name.name.clone(),
                }
            })
            .collect();
        self.numbering.pop();

        Ok(TableHeader {
            data: local.clone(),
            lexical: header.lexical.clone(),
            type_name: self.compile_type_name_opt(&header.type_name, &local),
            names,
        })
    }

    fn compile_table_body(
        &mut self,
        body: &TableBody<Parsed>,
        expected_columns: Option<usize>,
        parent: NodeId,
    ) -> Accumulate<TableBody<CompiledLocal>> {
        let local = self.new_local(parent);

        self.numbering.push();
        let rows = sequence(
            body.rows
                .iter()
                .map(|row| self.compile_table_row(row, expected_columns, local.node)),
        );
        self.numbering.pop();

        Ok(TableBody {
            data: local.clone(),
            lexical: body.lexical.clone(),
            type_name: self.compile_type_name_opt(&body.type_name, &local),
            rows: rows?,
        })
    }

    fn compile_table_row(
        &mut self,
        row: &TableRow<Parsed>,
        expected_columns: Option<usize>,
        parent: NodeId,
    ) -> Accumulate<TableRow<CompiledLocal>> {
        let local = self.new_local(parent);

        self.numbering.push();
        let result = match expected_columns.and_then(|expected| validator::check_row_shape(row, expected))
        {
            Some(error) => Err(vec![error]),
            None => sequence(
                row.cells
                    .iter()
                    .map(|cell| self.compile_table_cell(cell, local.node)),
            )
            .map(|cells| TableRow {
                data: local.clone(),
                lexical: row.lexical.clone(),
                type_name: self.compile_type_name_opt(&row.type_name, &local),
                cells,
            }),
        };
        self.numbering.pop();
        result
    }

    fn compile_table_cell(
        &mut self,
        cell: &TableCell<Parsed>,
        parent: NodeId,
    ) -> Accumulate<TableCell<CompiledLocal>> {
        let local = self.new_local(parent);
        let local_errors = validator::check_cell_content(cell);

        self.numbering.push();
        let content = sequence(
            cell.content
                .iter()
                .map(|inline| self.compile_inline(inline, local.node)),
        );
        self.numbering.pop();

        with_local_errors(local_errors, content).map(|content| TableCell {
            data: local.clone(),
            lexical: cell.lexical.clone(),
            type_name: self.compile_type_name_opt(&cell.type_name, &local),
            content,
        })
    }

    fn compile_text(&mut self, text: &Text<Parsed>, parent: NodeId) -> Text<CompiledLocal> {
        let local = self.new_local(parent);
        self.compile_text_with(text, &local)
    }

    fn compile_text_with(&self, text: &Text<Parsed>, local: &CompiledLocal) -> Text<CompiledLocal> {
        Text {
            data: local.clone(),
            lexical: text.lexical.clone(),
            text: text.text.clone(),
        }
    }

    fn compile_type_name_opt(
        &self,
        type_name: &Option<TypeName<Parsed>>,
        local: &CompiledLocal,
    ) -> Option<TypeName<CompiledLocal>> {
        type_name.as_ref().map(|type_name| TypeName {
            data: local.clone(),
            lexical: type_name.lexical.clone(),
            value: type_name.value.clone(),
        })
    }

    fn compile_block_id_opt(
        &self,
        id: &Option<BlockId<Parsed>>,
        local: &CompiledLocal,
    ) -> Option<BlockId<CompiledLocal>> {
        id.as_ref().map(|id| self.compile_block_id(id, local))
    }

    fn compile_block_id(
        &self,
        id: &BlockId<Parsed>,
        local: &CompiledLocal,
    ) -> BlockId<CompiledLocal> {
        BlockId {
            data: local.clone(),
            lexical: id.lexical.clone(),
            value: id.value.clone(),
        }
    }
}
