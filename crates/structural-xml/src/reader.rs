//! Mapping XML element trees onto the parsed document AST.
//!
//! The reader accumulates errors in the same spirit as the compiler: a
//! malformed element is recorded and skipped, and reading continues, so a
//! single parse reports every problem it can find. A tree is produced
//! only when no errors were recorded.

use crate::NAMESPACE;
use crate::error::ParseError;
use crate::types::{XmlElement, XmlNode};
use std::sync::Arc;
use structural_ast::{
    BlockId, Document, FootnoteReference, FormalItem, FormalItemReference, Image, ImageSize,
    Inline, Inlines, Lexical, Link, LinkContent, LinkExternal, ListItem, ListOrdered,
    ListUnordered, Paragraph, Parsed, Section, SectionWithContent, SectionWithSections,
    SectionWithSubsections, Subsection, SubsectionContent, Table, TableBody, TableCell,
    TableColumnName, TableHeader, TableRow, Term, Text, TypeName, Verbatim,
};
use structural_ast::Footnote;

/// Map a parsed XML element tree onto a document.
pub fn read_document(root: &XmlElement) -> Result<Document<Parsed>, Vec<ParseError>> {
    let mut reader = DocumentReader::default();
    let document = reader.document(root);
    if reader.errors.is_empty() {
        Ok(document)
    } else {
        Err(reader.errors)
    }
}

#[derive(Default)]
struct DocumentReader {
    errors: Vec<ParseError>,
}

impl DocumentReader {
    fn error(&mut self, lexical: &Lexical, message: impl Into<String>) {
        self.errors.push(ParseError::error(lexical.clone(), message));
    }

    fn document(&mut self, root: &XmlElement) -> Document<Parsed> {
        if root.name != "document" {
            self.error(
                &root.lexical,
                format!("expected a document element, received <{}>", root.name),
            );
        }
        match root.attribute("xmlns") {
            Some(ns) if ns == NAMESPACE => {}
            Some(ns) => self.error(
                &root.lexical,
                format!(
                    "unexpected document namespace {:?} (expected {:?})",
                    ns, NAMESPACE
                ),
            ),
            None => self.error(
                &root.lexical,
                format!("document must declare the namespace {:?}", NAMESPACE),
            ),
        }

        let title = self.required_attribute(root, "title");
        let mut sections = Vec::new();
        for child in self.block_children(root) {
            if child.name == "section" {
                if let Some(section) = self.section(child) {
                    sections.push(section);
                }
            } else {
                self.unexpected(child, "document");
            }
        }

        Document {
            data: Parsed,
            lexical: root.lexical.clone(),
            title,
            sections,
        }
    }

    fn section(&mut self, element: &XmlElement) -> Option<Section<Parsed>> {
        let title = self.required_attribute(element, "title");
        let type_name = self.type_name(element);
        let id = self.block_id_opt(element);
        let table_of_contents = self.toc_attribute(element);

        let children: Vec<&XmlElement> = self.block_children(element);
        let has = |name: &str| children.iter().any(|child| child.name == name);

        if has("section") {
            let mut sections = Vec::new();
            for child in &children {
                if child.name == "section" {
                    if let Some(section) = self.section(child) {
                        sections.push(section);
                    }
                } else {
                    self.error(
                        &child.lexical,
                        format!(
                            "sections containing nested sections cannot also contain <{}>",
                            child.name
                        ),
                    );
                }
            }
            Some(Section::WithSections(Arc::new(SectionWithSections {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name,
                id,
                title,
                table_of_contents,
                sections,
            })))
        } else if has("subsection") {
            let mut subsections = Vec::new();
            for child in &children {
                if child.name == "subsection" {
                    if let Some(subsection) = self.subsection(child) {
                        subsections.push(subsection);
                    }
                } else {
                    self.error(
                        &child.lexical,
                        format!(
                            "sections containing subsections cannot also contain <{}>",
                            child.name
                        ),
                    );
                }
            }
            Some(Section::WithSubsections(Arc::new(SectionWithSubsections {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name,
                id,
                title,
                table_of_contents,
                subsections,
            })))
        } else {
            let mut content = Vec::new();
            for child in &children {
                if let Some(item) = self.subsection_content(child) {
                    content.push(item);
                }
            }
            Some(Section::WithContent(Arc::new(SectionWithContent {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name,
                id,
                title,
                table_of_contents,
                content,
            })))
        }
    }

    fn subsection(&mut self, element: &XmlElement) -> Option<Arc<Subsection<Parsed>>> {
        let title = self.required_attribute(element, "title");
        let type_name = self.type_name(element);
        let id = self.block_id_opt(element);

        let mut content = Vec::new();
        for child in self.block_children(element) {
            if let Some(item) = self.subsection_content(child) {
                content.push(item);
            }
        }

        Some(Arc::new(Subsection {
            data: Parsed,
            lexical: element.lexical.clone(),
            type_name,
            id,
            title,
            content,
        }))
    }

    fn subsection_content(&mut self, element: &XmlElement) -> Option<SubsectionContent<Parsed>> {
        match element.name.as_str() {
            "paragraph" => Some(SubsectionContent::Paragraph(Arc::new(Paragraph {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                id: self.block_id_opt(element),
                content: self.inline_content(element),
            }))),
            "formal-item" => Some(SubsectionContent::FormalItem(Arc::new(FormalItem {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                id: self.block_id_opt(element),
                title: self.required_attribute(element, "title"),
                content: self.inline_content(element),
            }))),
            "footnote" => {
                let id = self.required_block_id(element)?;
                Some(SubsectionContent::Footnote(Arc::new(Footnote {
                    data: Parsed,
                    lexical: element.lexical.clone(),
                    type_name: self.type_name(element),
                    id,
                    content: self.inline_content(element),
                })))
            }
            _ => {
                self.unexpected(element, "subsection content");
                None
            }
        }
    }

    /// Read mixed inline content: interleaved text and inline elements.
    fn inline_content(&mut self, element: &XmlElement) -> Inlines<Parsed> {
        let mut content = Vec::new();
        for child in &element.children {
            match child {
                XmlNode::Text {
                    content: text,
                    lexical,
                } => content.push(Inline::Text(Text {
                    data: Parsed,
                    lexical: lexical.clone(),
                    text: text.clone(),
                })),
                XmlNode::Element(child) => {
                    if let Some(inline) = self.inline_element(child) {
                        content.push(inline);
                    }
                }
            }
        }
        content
    }

    fn inline_element(&mut self, element: &XmlElement) -> Option<Inline<Parsed>> {
        match element.name.as_str() {
            "term" => Some(Inline::Term(Term {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                text: self.text_children(element),
            })),
            "image" => self.image(element).map(Inline::Image),
            "link" => Some(Inline::Link(Link {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                target: self.required_attribute(element, "target"),
                content: self.link_content(element),
            })),
            "link-external" => Some(Inline::LinkExternal(LinkExternal {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                target: self.required_attribute(element, "target"),
                content: self.link_content(element),
            })),
            "footnote-ref" => Some(Inline::FootnoteReference(FootnoteReference {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                target: self.required_attribute(element, "target"),
            })),
            "formal-item-ref" => Some(Inline::FormalItemReference(FormalItemReference {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                target: self.required_attribute(element, "target"),
            })),
            "verbatim" => Some(Inline::Verbatim(Verbatim {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                text: Text {
                    data: Parsed,
                    lexical: element.lexical.clone(),
                    text: element.text_content(),
                },
            })),
            "list-ordered" => Some(Inline::ListOrdered(ListOrdered {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                items: self.list_items(element),
            })),
            "list-unordered" => Some(Inline::ListUnordered(ListUnordered {
                data: Parsed,
                lexical: element.lexical.clone(),
                type_name: self.type_name(element),
                items: self.list_items(element),
            })),
            "table" => self.table(element).map(Inline::Table),
            _ => {
                self.unexpected(element, "inline content");
                None
            }
        }
    }

    fn image(&mut self, element: &XmlElement) -> Option<Image<Parsed>> {
        let source = self.required_attribute(element, "source");

        let width = self.numeric_attribute(element, "width");
        let height = self.numeric_attribute(element, "height");
        let size = match (width, height) {
            (Some(width), Some(height)) => Some(ImageSize {
                data: Parsed,
                lexical: element.lexical.clone(),
                width,
                height,
            }),
            (None, None) => None,
            _ => {
                self.error(
                    &element.lexical,
                    "images must specify both width and height, or neither",
                );
                None
            }
        };

        Some(Image {
            data: Parsed,
            lexical: element.lexical.clone(),
            type_name: self.type_name(element),
            source,
            size,
            text: self.text_children(element),
        })
    }

    fn link_content(&mut self, element: &XmlElement) -> Vec<LinkContent<Parsed>> {
        let mut content = Vec::new();
        for child in &element.children {
            match child {
                XmlNode::Text {
                    content: text,
                    lexical,
                } => content.push(LinkContent::Text(Text {
                    data: Parsed,
                    lexical: lexical.clone(),
                    text: text.clone(),
                })),
                XmlNode::Element(child) if child.name == "image" => {
                    if let Some(image) = self.image(child) {
                        content.push(LinkContent::Image(image));
                    }
                }
                XmlNode::Element(child) => {
                    self.error(
                        &child.lexical,
                        format!("links may only contain text and images, received <{}>", child.name),
                    );
                }
            }
        }
        content
    }

    fn list_items(&mut self, element: &XmlElement) -> Vec<ListItem<Parsed>> {
        let mut items = Vec::new();
        for child in self.block_children(element) {
            if child.name == "list-item" {
                items.push(ListItem {
                    data: Parsed,
                    lexical: child.lexical.clone(),
                    content: self.inline_content(child),
                });
            } else {
                self.unexpected(child, "list");
            }
        }
        items
    }

    fn table(&mut self, element: &XmlElement) -> Option<Table<Parsed>> {
        let mut header = None;
        let mut body = None;

        for child in self.block_children(element) {
            match child.name.as_str() {
                "table-head" => {
                    if header.is_some() {
                        self.error(&child.lexical, "tables may contain at most one table-head");
                    } else {
                        header = Some(self.table_header(child));
                    }
                }
                "table-body" => {
                    if body.is_some() {
                        self.error(&child.lexical, "tables must contain exactly one table-body");
                    } else {
                        body = Some(self.table_body(child));
                    }
                }
                _ => self.unexpected(child, "table"),
            }
        }

        let Some(body) = body else {
            self.error(&element.lexical, "tables must contain a table-body");
            return None;
        };

        Some(Table {
            data: Parsed,
            lexical: element.lexical.clone(),
            type_name: self.type_name(element),
            header,
            body,
        })
    }

    fn table_header(&mut self, element: &XmlElement) -> TableHeader<Parsed> {
        let mut names = Vec::new();
        for child in self.block_children(element) {
            if child.name == "table-column-name" {
                names.push(TableColumnName {
                    data: Parsed,
                    lexical: child.lexical.clone(),
                    type_name: self.type_name(child),
                    name: child.text_content(),
                });
            } else {
                self.unexpected(child, "table-head");
            }
        }
        TableHeader {
            data: Parsed,
            lexical: element.lexical.clone(),
            type_name: self.type_name(element),
            names,
        }
    }

    fn table_body(&mut self, element: &XmlElement) -> TableBody<Parsed> {
        let mut rows = Vec::new();
        for child in self.block_children(element) {
            if child.name == "table-row" {
                rows.push(self.table_row(child));
            } else {
                self.unexpected(child, "table-body");
            }
        }
        TableBody {
            data: Parsed,
            lexical: element.lexical.clone(),
            type_name: self.type_name(element),
            rows,
        }
    }

    fn table_row(&mut self, element: &XmlElement) -> TableRow<Parsed> {
        let mut cells = Vec::new();
        for child in self.block_children(element) {
            if child.name == "table-cell" {
                cells.push(TableCell {
                    data: Parsed,
                    lexical: child.lexical.clone(),
                    type_name: self.type_name(child),
                    content: self.inline_content(child),
                });
            } else {
                self.unexpected(child, "table-row");
            }
        }
        TableRow {
            data: Parsed,
            lexical: element.lexical.clone(),
            type_name: self.type_name(element),
            cells,
        }
    }

    /// Text-only children, for terms and image descriptions.
    fn text_children(&mut self, element: &XmlElement) -> Vec<Text<Parsed>> {
        let mut texts = Vec::new();
        for child in &element.children {
            match child {
                XmlNode::Text { content, lexical } => texts.push(Text {
                    data: Parsed,
                    lexical: lexical.clone(),
                    text: content.clone(),
                }),
                XmlNode::Element(child) => {
                    self.error(
                        &child.lexical,
                        format!("<{}> may only contain text, received <{}>", element.name, child.name),
                    );
                }
            }
        }
        texts
    }

    /// Element children of a block-level container. Whitespace-only text
    /// between blocks is ignored; any other stray text is an error.
    fn block_children<'e>(&mut self, element: &'e XmlElement) -> Vec<&'e XmlElement> {
        let mut children = Vec::new();
        for child in &element.children {
            match child {
                XmlNode::Element(child) => children.push(child),
                XmlNode::Text { content, lexical } => {
                    if !content.trim().is_empty() {
                        self.error(
                            lexical,
                            format!("unexpected text inside <{}>", element.name),
                        );
                    }
                }
            }
        }
        children
    }

    fn unexpected(&mut self, element: &XmlElement, context: &str) {
        self.error(
            &element.lexical,
            format!("unrecognized element <{}> in {}", element.name, context),
        );
    }

    fn required_attribute(&mut self, element: &XmlElement, name: &str) -> String {
        match element.attribute(name) {
            Some(value) => value.to_string(),
            None => {
                self.error(
                    &element.lexical,
                    format!("<{}> requires a {:?} attribute", element.name, name),
                );
                String::new()
            }
        }
    }

    fn numeric_attribute(&mut self, element: &XmlElement, name: &str) -> Option<u64> {
        let attribute = element.attribute_full(name)?;
        match attribute.value.parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.error(
                    &attribute.lexical,
                    format!(
                        "attribute {:?} must be a non-negative integer, received {:?}",
                        name, attribute.value
                    ),
                );
                None
            }
        }
    }

    fn toc_attribute(&mut self, element: &XmlElement) -> bool {
        match element.attribute_full("table-of-contents") {
            None => true,
            Some(attribute) => match attribute.value.as_str() {
                "true" => true,
                "false" => false,
                other => {
                    self.error(
                        &attribute.lexical,
                        format!(
                            "attribute \"table-of-contents\" must be true or false, received {:?}",
                            other
                        ),
                    );
                    true
                }
            },
        }
    }

    fn type_name(&mut self, element: &XmlElement) -> Option<TypeName<Parsed>> {
        let attribute = element.attribute_full("type")?;
        if !TypeName::<Parsed>::is_valid(&attribute.value) {
            self.error(
                &attribute.lexical,
                format!("{:?} is not a valid type name", attribute.value),
            );
            return None;
        }
        Some(TypeName {
            data: Parsed,
            lexical: attribute.lexical.clone(),
            value: attribute.value.clone(),
        })
    }

    fn block_id_opt(&mut self, element: &XmlElement) -> Option<BlockId<Parsed>> {
        let attribute = element.attribute_full("id")?;
        if !BlockId::<Parsed>::is_valid(&attribute.value) {
            self.error(
                &attribute.lexical,
                format!("{:?} is not a valid block identifier", attribute.value),
            );
            return None;
        }
        Some(BlockId {
            data: Parsed,
            lexical: attribute.lexical.clone(),
            value: attribute.value.clone(),
        })
    }

    fn required_block_id(&mut self, element: &XmlElement) -> Option<BlockId<Parsed>> {
        if element.attribute("id").is_none() {
            self.error(
                &element.lexical,
                format!("<{}> requires an \"id\" attribute", element.name),
            );
            return None;
        }
        self.block_id_opt(element)
    }
}
