//! The format probe for structural XML.

use crate::NAMESPACE;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io;
use std::io::Read;
use structural_probe::{FormatDescription, Probe, ProbeRequest};

/// How many bytes of the input the probe is willing to inspect before
/// giving up on finding the root element.
const PROBE_LIMIT: u64 = 8192;

/// A probe recognizing structural XML documents: the input starts with a
/// `document` root element in the structural namespace.
#[derive(Debug, Default)]
pub struct XmlProbe;

impl XmlProbe {
    pub fn new() -> Self {
        Self
    }

    fn format() -> FormatDescription {
        FormatDescription {
            name: "com.structural.xml".to_string(),
            description: "structural XML format".to_string(),
            mime_type: "application/xml".to_string(),
            version_major: 1,
            version_minor: 0,
        }
    }
}

impl Probe for XmlProbe {
    fn probe(&self, request: &ProbeRequest<'_>) -> io::Result<Option<FormatDescription>> {
        let mut head = Vec::new();
        request
            .streams
            .open()?
            .take(PROBE_LIMIT)
            .read_to_end(&mut head)?;

        // The probe window may cut the input mid-character; a lossy view
        // is fine for recognizing the root element.
        let head = String::from_utf8_lossy(&head);
        let mut reader = Reader::from_str(&head);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e) | Event::Empty(e)) => {
                    let is_document = e.name().as_ref() == b"document";
                    let in_namespace = e.attributes().any(|attribute| {
                        attribute.is_ok_and(|attribute| {
                            attribute.key.as_ref() == b"xmlns"
                                && attribute.value.as_ref() == NAMESPACE.as_bytes()
                        })
                    });
                    return Ok((is_document && in_namespace).then(Self::format));
                }
                Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_)) => {}
                Ok(Event::Text(_)) => {}
                Ok(Event::Eof) | Err(_) => return Ok(None),
                _ => return Ok(None),
            }
        }
    }
}
