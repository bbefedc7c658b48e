//! A lightweight XML element tree with source positions.
//!
//! The event-based parser produces this tree; the document reader then
//! maps it onto the AST. Keeping the two stages separate keeps the
//! error-accumulating reader free of streaming concerns.

use structural_ast::Lexical;

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// The position of the element's start tag.
    pub lexical: Lexical,

    /// The element's attributes, in document order. Namespace
    /// declarations (`xmlns`, `xmlns:*`) are included verbatim.
    pub attributes: Vec<XmlAttribute>,

    /// Child content: elements and text, interleaved in document order.
    pub children: Vec<XmlNode>,
}

/// An XML attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub lexical: Lexical,
    pub value: String,
}

/// A single child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text { content: String, lexical: Lexical },
}

impl XmlElement {
    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    /// Get an attribute by name, with its position.
    pub fn attribute_full(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
    }

    /// All child elements, ignoring interleaved text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text { .. } => None,
        })
    }

    /// The concatenated text content of this element's direct children.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            if let XmlNode::Text { content, .. } = child {
                text.push_str(content);
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, attributes: Vec<XmlAttribute>, children: Vec<XmlNode>) -> XmlElement {
        XmlElement {
            name: name.to_string(),
            lexical: Lexical::default(),
            attributes,
            children,
        }
    }

    #[test]
    fn attribute_lookup() {
        let el = element(
            "section",
            vec![XmlAttribute {
                name: "title".to_string(),
                lexical: Lexical::default(),
                value: "Introduction".to_string(),
            }],
            vec![],
        );
        assert_eq!(el.attribute("title"), Some("Introduction"));
        assert_eq!(el.attribute("id"), None);
    }

    #[test]
    fn text_content_joins_direct_text() {
        let el = element(
            "verbatim",
            vec![],
            vec![
                XmlNode::Text {
                    content: "one ".to_string(),
                    lexical: Lexical::default(),
                },
                XmlNode::Element(element("x", vec![], vec![])),
                XmlNode::Text {
                    content: "two".to_string(),
                    lexical: Lexical::default(),
                },
            ],
        );
        assert_eq!(el.text_content(), "one two");
    }
}
