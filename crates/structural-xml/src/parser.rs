//! Event-based XML parsing into [`XmlElement`] trees.

use crate::error::ParseError;
use crate::types::{XmlAttribute, XmlElement, XmlNode};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use structural_ast::Lexical;

/// Parse XML from a string, producing an element tree.
///
/// Syntax-level failures (malformed XML, mismatched tags, missing root)
/// are unrecoverable and reported as a single fatal error; everything
/// above the syntax level is left to the document reader, which
/// accumulates its errors.
pub fn parse_str(source: &str, file: Option<&str>) -> Result<XmlElement, ParseError> {
    XmlParser::new(source, file).parse()
}

/// Maps byte offsets to line and column numbers.
pub(crate) struct LineMap {
    line_starts: Vec<usize>,
}

impl LineMap {
    pub(crate) fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    /// The 1-indexed line and column of a byte offset.
    pub(crate) fn locate(&self, offset: usize) -> (u64, u64) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let column = offset - self.line_starts[line];
        ((line + 1) as u64, (column + 1) as u64)
    }

    fn lexical(&self, offset: usize, file: Option<&str>) -> Lexical {
        let (line, column) = self.locate(offset);
        Lexical {
            line,
            column,
            file: file.map(str::to_string),
        }
    }
}

/// Internal parser state.
struct XmlParser<'a> {
    reader: Reader<&'a [u8]>,
    lines: LineMap,
    file: Option<&'a str>,

    /// Stack of elements being built.
    stack: Vec<XmlElement>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str, file: Option<&'a str>) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            lines: LineMap::new(source),
            file,
            stack: Vec::new(),
        }
    }

    fn lexical_at(&self, offset: usize) -> Lexical {
        let (line, column) = self.lines.locate(offset);
        Lexical {
            line,
            column,
            file: self.file.map(str::to_string),
        }
    }

    fn parse(&mut self) -> Result<XmlElement, ParseError> {
        let mut root: Option<XmlElement> = None;

        loop {
            // Capture position before reading the event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = self.open_element(&e, event_start)?;
                    self.stack.push(element);
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    let element = self.stack.pop().ok_or_else(|| {
                        ParseError::fatal(
                            self.lexical_at(event_start),
                            format!("unexpected closing tag </{}>", name),
                        )
                    })?;
                    self.attach(element, &mut root, event_start)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.open_element(&e, event_start)?;
                    self.attach(element, &mut root, event_start)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e.unescape().map_err(|error| {
                        ParseError::fatal(
                            self.lexical_at(event_start),
                            format!("invalid text content: {}", error),
                        )
                    })?;
                    if let Some(parent) = self.stack.last_mut() {
                        parent.children.push(XmlNode::Text {
                            content: text.into_owned(),
                            lexical: self.lines.lexical(event_start, self.file),
                        });
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    if let Some(parent) = self.stack.last_mut() {
                        parent.children.push(XmlNode::Text {
                            content: text,
                            lexical: self.lines.lexical(event_start, self.file),
                        });
                    }
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {
                    // Skipped: carry no document content
                }
                Ok(Event::Eof) => break,
                Err(error) => {
                    let offset = self.reader.error_position() as usize;
                    return Err(ParseError::fatal(
                        self.lexical_at(offset),
                        format!("XML syntax error: {}", error),
                    ));
                }
            }
        }

        if let Some(unclosed) = self.stack.last() {
            return Err(ParseError::fatal(
                unclosed.lexical.clone(),
                format!("unexpected end of input, expected </{}>", unclosed.name),
            ));
        }

        root.ok_or_else(|| {
            ParseError::fatal(
                self.lexical_at(0),
                "empty XML document: no root element found",
            )
        })
    }

    fn open_element(
        &self,
        e: &BytesStart<'_>,
        event_start: usize,
    ) -> Result<XmlElement, ParseError> {
        let lexical = self.lexical_at(event_start);
        let name = local_name(&String::from_utf8_lossy(e.name().as_ref()));

        let mut attributes = Vec::new();
        for attribute in e.attributes() {
            let attribute = attribute.map_err(|error| {
                ParseError::fatal(lexical.clone(), format!("invalid attribute: {}", error))
            })?;
            let value = attribute.unescape_value().map_err(|error| {
                ParseError::fatal(
                    lexical.clone(),
                    format!("invalid attribute value: {}", error),
                )
            })?;
            attributes.push(XmlAttribute {
                name: String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                lexical: lexical.clone(),
                value: value.into_owned(),
            });
        }

        Ok(XmlElement {
            name,
            lexical,
            attributes,
            children: Vec::new(),
        })
    }

    fn attach(
        &mut self,
        element: XmlElement,
        root: &mut Option<XmlElement>,
        event_start: usize,
    ) -> Result<(), ParseError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(XmlNode::Element(element));
            return Ok(());
        }
        if root.is_some() {
            return Err(ParseError::fatal(
                self.lexical_at(event_start),
                "invalid XML: multiple root elements",
            ));
        }
        *root = Some(element);
        Ok(())
    }
}

fn local_name(name: &str) -> String {
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.to_string(),
    }
}
