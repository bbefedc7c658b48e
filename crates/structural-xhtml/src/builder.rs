//! Construction of XHTML elements from compiled nodes.
//!
//! A builder instance borrows the compiled document's global context (for
//! footnote ordinals and formal-item numbers) and a link provider that
//! resolves block identifiers to `"file#anchor"` links.

use crate::anchors::{anchor_for, class_for};
use crate::element::{XhtmlElement, XhtmlNode};
use crate::{LinkProvider, RenderError};
use structural_ast::{
    BlockKind, FootnoteReference, FormalItem, FormalItemReference, Image, Inline, Link,
    LinkContent, LinkExternal, ListItem, ListOrdered, ListUnordered, Paragraph, Section,
    Subsection, SubsectionContent, Table, Term, Text, TypeName, Verbatim,
};
use structural_ast::{Document, Footnote};
use structural_compiler::{CompiledLocal, GlobalContext};

/// A builder of XHTML elements.
pub struct XhtmlBuilder<'a> {
    global: &'a GlobalContext,
    links: &'a dyn LinkProvider,
}

impl<'a> XhtmlBuilder<'a> {
    pub fn new(global: &'a GlobalContext, links: &'a dyn LinkProvider) -> Self {
        Self { global, links }
    }

    /// Construct an XHTML node for the given text.
    pub fn text(&self, text: &Text<CompiledLocal>) -> XhtmlNode {
        XhtmlNode::Text(text.text.clone())
    }

    /// Construct an XHTML element for the given term.
    pub fn term(&self, term: &Term<CompiledLocal>) -> XhtmlElement {
        let mut element = classed(XhtmlElement::new("span"), "st_term", term.type_name.as_ref());
        for text in &term.text {
            element.push(self.text(text));
        }
        element
    }

    /// Construct an XHTML element for the given image.
    pub fn image(&self, image: &Image<CompiledLocal>) -> XhtmlElement {
        let mut element = XhtmlElement::new("img").with_attribute("href", image.source.clone());
        if let Some(size) = &image.size {
            element = element
                .with_attribute("width", size.width.to_string())
                .with_attribute("height", size.height.to_string());
        }
        let mut element = classed(element, "st_image", image.type_name.as_ref());
        for text in &image.text {
            element.push(self.text(text));
        }
        element
    }

    /// Construct an XHTML element for the given external link.
    pub fn link_external(&self, link: &LinkExternal<CompiledLocal>) -> XhtmlElement {
        let mut element = classed(
            XhtmlElement::new("a").with_attribute("href", link.target.clone()),
            "st_link_external",
            link.type_name.as_ref(),
        );
        for content in &link.content {
            element.push(self.link_content(content));
        }
        element
    }

    /// Construct an XHTML element for the given internal link.
    pub fn link(&self, link: &Link<CompiledLocal>) -> Result<XhtmlElement, RenderError> {
        let target = self.links.link_of(&link.target)?;
        let mut element = classed(
            XhtmlElement::new("a").with_attribute("href", target),
            "st_link",
            link.type_name.as_ref(),
        );
        for content in &link.content {
            element.push(self.link_content(content));
        }
        Ok(element)
    }

    /// Construct an XHTML node for the given link content.
    pub fn link_content(&self, content: &LinkContent<CompiledLocal>) -> XhtmlNode {
        match content {
            LinkContent::Text(text) => self.text(text),
            LinkContent::Image(image) => XhtmlNode::Element(self.image(image)),
        }
    }

    /// Construct an XHTML element for the given footnote reference: the
    /// footnote's ordinal in brackets, linking to the footnote.
    pub fn footnote_reference(
        &self,
        reference: &FootnoteReference<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let footnote = self.global.find_footnote_for(&reference.target)?;
        let index = self.global.footnote_index_of(footnote)?;

        let link = XhtmlElement::new("a")
            .with_attribute("href", self.links.link_of(&reference.target)?)
            .with_text(index.to_string());

        Ok(
            classed(XhtmlElement::new("span"), "st_footnote_reference", reference.type_name.as_ref())
                .with_text("[")
                .with_child(link)
                .with_text("]"),
        )
    }

    /// Construct an XHTML element for the given formal item reference:
    /// the item's content number in brackets, linking to the item.
    pub fn formal_item_reference(
        &self,
        reference: &FormalItemReference<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let formal = self.global.find_formal_item_for(&reference.target)?;

        let link = XhtmlElement::new("a")
            .with_attribute("href", self.links.link_of(&reference.target)?)
            .with_text(formal.data.number.to_human_string());

        Ok(classed(
            XhtmlElement::new("span"),
            "st_formal_item_reference",
            reference.type_name.as_ref(),
        )
        .with_text("[")
        .with_child(link)
        .with_text("]"))
    }

    /// Construct an XHTML element for the given verbatim text.
    pub fn verbatim(&self, verbatim: &Verbatim<CompiledLocal>) -> XhtmlElement {
        classed(XhtmlElement::new("pre"), "st_verbatim", verbatim.type_name.as_ref())
            .with_text(verbatim.text.text.clone())
    }

    /// Construct an XHTML element for the given ordered list.
    pub fn list_ordered(
        &self,
        list: &ListOrdered<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let element = classed(XhtmlElement::new("ol"), "st_list_ordered", list.type_name.as_ref());
        self.list_items(element, &list.items)
    }

    /// Construct an XHTML element for the given unordered list.
    pub fn list_unordered(
        &self,
        list: &ListUnordered<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let element = classed(XhtmlElement::new("ul"), "st_list_unordered", list.type_name.as_ref());
        self.list_items(element, &list.items)
    }

    fn list_items(
        &self,
        mut element: XhtmlElement,
        items: &[ListItem<CompiledLocal>],
    ) -> Result<XhtmlElement, RenderError> {
        for item in items {
            let mut item_element = XhtmlElement::new("li");
            for content in &item.content {
                item_element.push(self.inline_any(content)?);
            }
            element.push_element(item_element);
        }
        Ok(element)
    }

    /// Construct an XHTML element for the given table.
    pub fn table(&self, table: &Table<CompiledLocal>) -> Result<XhtmlElement, RenderError> {
        let mut element = classed(XhtmlElement::new("table"), "st_table", table.type_name.as_ref());

        if let Some(header) = &table.header {
            let mut row = XhtmlElement::new("tr");
            for name in &header.names {
                row.push_element(
                    classed(XhtmlElement::new("th"), "st_table_column_name", name.type_name.as_ref())
                        .with_text(name.name.clone()),
                );
            }
            element.push_element(XhtmlElement::new("thead").with_child(row));
        }

        let mut body = XhtmlElement::new("tbody");
        for row in &table.body.rows {
            let mut row_element = classed(XhtmlElement::new("tr"), "st_table_row", row.type_name.as_ref());
            for cell in &row.cells {
                let mut cell_element =
                    classed(XhtmlElement::new("td"), "st_table_cell", cell.type_name.as_ref());
                for content in &cell.content {
                    cell_element.push(self.inline_any(content)?);
                }
                row_element.push_element(cell_element);
            }
            body.push_element(row_element);
        }
        element.push_element(body);

        Ok(element)
    }

    /// Construct an XHTML node for the given inline content.
    pub fn inline_any(&self, content: &Inline<CompiledLocal>) -> Result<XhtmlNode, RenderError> {
        Ok(match content {
            Inline::Text(text) => self.text(text),
            Inline::Term(term) => XhtmlNode::Element(self.term(term)),
            Inline::Image(image) => XhtmlNode::Element(self.image(image)),
            Inline::Link(link) => XhtmlNode::Element(self.link(link)?),
            Inline::LinkExternal(link) => XhtmlNode::Element(self.link_external(link)),
            Inline::FootnoteReference(reference) => {
                XhtmlNode::Element(self.footnote_reference(reference)?)
            }
            Inline::FormalItemReference(reference) => {
                XhtmlNode::Element(self.formal_item_reference(reference)?)
            }
            Inline::Verbatim(verbatim) => XhtmlNode::Element(self.verbatim(verbatim)),
            Inline::ListOrdered(list) => XhtmlNode::Element(self.list_ordered(list)?),
            Inline::ListUnordered(list) => XhtmlNode::Element(self.list_unordered(list)?),
            Inline::Table(table) => XhtmlNode::Element(self.table(table)?),
        })
    }

    /// Construct an XHTML element for the given paragraph.
    pub fn paragraph(
        &self,
        paragraph: &Paragraph<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let anchor = anchor_for(BlockKind::Paragraph, &paragraph.data.number);

        let number = XhtmlElement::new("div")
            .with_attribute("class", "st_paragraph_number")
            .with_child(
                XhtmlElement::new("a")
                    .with_attribute("id", anchor.clone())
                    .with_attribute("href", format!("#{}", anchor))
                    .with_text(paragraph.data.number.last().to_string()),
            );

        let mut content = XhtmlElement::new("p").with_attribute("class", "st_paragraph_content");
        for inline in &paragraph.content {
            content.push(self.inline_any(inline)?);
        }

        Ok(classed(XhtmlElement::new("div"), "st_paragraph", paragraph.type_name.as_ref())
            .with_child(number)
            .with_child(content))
    }

    /// Construct an XHTML element for the given formal item.
    pub fn formal_item(
        &self,
        formal: &FormalItem<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let anchor = anchor_for(BlockKind::FormalItem, &formal.data.number);

        let title = XhtmlElement::new("h4").with_child(
            XhtmlElement::new("a")
                .with_attribute("id", anchor.clone())
                .with_attribute("href", format!("#{}", anchor))
                .with_text(format!(
                    "{}. {}",
                    formal.data.number.to_human_string(),
                    formal.title
                )),
        );

        let mut content =
            XhtmlElement::new("p").with_attribute("class", "st_formal_item_content");
        for inline in &formal.content {
            content.push(self.inline_any(inline)?);
        }

        Ok(classed(XhtmlElement::new("div"), "st_formal_item", formal.type_name.as_ref())
            .with_child(title)
            .with_child(content))
    }

    /// Construct an XHTML element for the given footnote, as it appears
    /// in the footnote block at the end of the document.
    pub fn footnote(&self, footnote: &Footnote<CompiledLocal>) -> Result<XhtmlElement, RenderError> {
        let anchor = anchor_for(BlockKind::Footnote, &footnote.data.number);
        let index = self.global.footnote_index_of(footnote)?;

        let number = XhtmlElement::new("div")
            .with_attribute("class", "st_footnote_number")
            .with_text("[")
            .with_child(
                XhtmlElement::new("a")
                    .with_attribute("id", anchor.clone())
                    .with_attribute("href", format!("#{}", anchor))
                    .with_text(index.to_string()),
            )
            .with_text("]");

        let mut content = XhtmlElement::new("span").with_attribute("class", "st_footnote_content");
        for inline in &footnote.content {
            content.push(self.inline_any(inline)?);
        }

        Ok(classed(XhtmlElement::new("div"), "st_footnote", footnote.type_name.as_ref())
            .with_child(number)
            .with_child(content))
    }

    /// Construct an XHTML element for the given subsection.
    pub fn subsection(
        &self,
        subsection: &Subsection<CompiledLocal>,
    ) -> Result<XhtmlElement, RenderError> {
        let anchor = anchor_for(BlockKind::Subsection, &subsection.data.number);

        let number = XhtmlElement::new("div")
            .with_attribute("class", "st_subsection_number")
            .with_child(
                XhtmlElement::new("a")
                    .with_attribute("id", anchor.clone())
                    .with_attribute("href", format!("#{}", anchor))
                    .with_text(subsection.data.number.to_human_string()),
            );

        let title = XhtmlElement::new("h3")
            .with_attribute("class", "st_subsection_title")
            .with_text(subsection.title.clone());

        let mut element = classed(XhtmlElement::new("div"), "st_subsection", subsection.type_name.as_ref())
            .with_child(number)
            .with_child(title);

        for content in &subsection.content {
            if let Some(child) = self.subsection_content(content)? {
                element.push_element(child);
            }
        }
        Ok(element)
    }

    /// Construct an XHTML element for the given subsection content.
    /// Footnotes yield nothing here; they render in the document's
    /// footnote block instead.
    pub fn subsection_content(
        &self,
        content: &SubsectionContent<CompiledLocal>,
    ) -> Result<Option<XhtmlElement>, RenderError> {
        match content {
            SubsectionContent::Paragraph(paragraph) => self.paragraph(paragraph).map(Some),
            SubsectionContent::FormalItem(formal) => self.formal_item(formal).map(Some),
            SubsectionContent::Footnote(_) => Ok(None),
        }
    }

    /// Construct an XHTML element for the given section.
    pub fn section(&self, section: &Section<CompiledLocal>) -> Result<XhtmlElement, RenderError> {
        let local = section.data();
        let anchor = anchor_for(BlockKind::Section, &local.number);

        let number = XhtmlElement::new("div")
            .with_attribute("class", "st_section_number")
            .with_child(
                XhtmlElement::new("a")
                    .with_attribute("id", anchor.clone())
                    .with_attribute("href", format!("#{}", anchor))
                    .with_text(local.number.to_human_string()),
            );

        let title = XhtmlElement::new("h2")
            .with_attribute("class", "st_section_title")
            .with_text(section.title().to_string());

        let mut element = classed(XhtmlElement::new("div"), "st_section", section.type_name())
            .with_child(number)
            .with_child(title);

        match section {
            Section::WithSections(section) => {
                for child in &section.sections {
                    element.push_element(self.section(child)?);
                }
            }
            Section::WithSubsections(section) => {
                for child in &section.subsections {
                    element.push_element(self.subsection(child)?);
                }
            }
            Section::WithContent(section) => {
                for child in &section.content {
                    if let Some(element_child) = self.subsection_content(child)? {
                        element.push_element(element_child);
                    }
                }
            }
        }
        Ok(element)
    }

    /// Construct the XHTML element for an entire document: title,
    /// sections, and the footnote block.
    pub fn document(&self, document: &Document<CompiledLocal>) -> Result<XhtmlElement, RenderError> {
        let anchor = anchor_for(BlockKind::Document, &document.data.number);

        let title = XhtmlElement::new("h1")
            .with_attribute("class", "st_document_title")
            .with_child(
                XhtmlElement::new("a")
                    .with_attribute("id", anchor.clone())
                    .with_attribute("href", format!("#{}", anchor))
                    .with_text(document.title.clone()),
            );

        let mut element = XhtmlElement::new("div")
            .with_attribute("class", "st_document")
            .with_child(title);

        for section in &document.sections {
            element.push_element(self.section(section)?);
        }

        if !self.global.footnotes().is_empty() {
            let mut footnotes = XhtmlElement::new("div").with_attribute("class", "st_footnotes");
            for footnote in self.global.footnotes() {
                footnotes.push_element(self.footnote(footnote)?);
            }
            element.push_element(footnotes);
        }

        Ok(element)
    }
}

fn classed(
    element: XhtmlElement,
    base: &'static str,
    type_name: Option<&TypeName<CompiledLocal>>,
) -> XhtmlElement {
    match class_for(base, type_name) {
        Some(class) => element.with_attribute("class", class),
        None => element,
    }
}
