//! A lightweight XHTML element tree and its serializer.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io;

/// An XHTML element under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct XhtmlElement {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<XhtmlNode>,
}

/// A node in the XHTML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XhtmlNode {
    Element(XhtmlElement),
    Text(String),
}

impl XhtmlElement {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn with_child(mut self, child: XhtmlElement) -> Self {
        self.children.push(XhtmlNode::Element(child));
        self
    }

    pub fn with_node(mut self, node: XhtmlNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XhtmlNode::Text(text.into()));
        self
    }

    pub fn push(&mut self, node: XhtmlNode) {
        self.children.push(node);
    }

    pub fn push_element(&mut self, element: XhtmlElement) {
        self.children.push(XhtmlNode::Element(element));
    }

    /// Serialize this element to XHTML text. Text content and attribute
    /// values are escaped by the writer.
    pub fn serialize(&self) -> io::Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        let bytes = writer.into_inner();
        // The writer only ever receives UTF-8 strings.
        Ok(String::from_utf8(bytes).expect("serialized XHTML is UTF-8"))
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> io::Result<()> {
        let mut start = BytesStart::new(self.name);
        for (name, value) in &self.attributes {
            start.push_attribute((*name, value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                XhtmlNode::Element(element) => element.write_into(writer)?,
                XhtmlNode::Text(text) => {
                    writer.write_event(Event::Text(BytesText::new(text)))?;
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_elements() {
        let element = XhtmlElement::new("div")
            .with_attribute("class", "outer")
            .with_child(XhtmlElement::new("span").with_text("hello"));
        assert_eq!(
            element.serialize().unwrap(),
            r#"<div class="outer"><span>hello</span></div>"#
        );
    }

    #[test]
    fn empty_elements_self_close() {
        let element = XhtmlElement::new("img").with_attribute("href", "x.png");
        assert_eq!(element.serialize().unwrap(), r#"<img href="x.png"/>"#);
    }

    #[test]
    fn text_is_escaped() {
        let element = XhtmlElement::new("p").with_text("a < b & c");
        assert_eq!(
            element.serialize().unwrap(),
            "<p>a &lt; b &amp; c</p>"
        );
    }
}
