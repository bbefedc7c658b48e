/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * The XML front end for structural documents.
 *
 * Parsing happens in two stages: an event-based parser builds a
 * source-tracked element tree, and a document reader maps that tree onto
 * the parsed-phase AST, accumulating every error it can find. The crate
 * also provides the format probe used to select this parser.
 */

pub mod error;
pub mod parser;
pub mod probe;
pub mod reader;
pub mod types;

pub use error::{ParseError, Severity};
pub use probe::XmlProbe;
pub use types::{XmlAttribute, XmlElement, XmlNode};

use std::io::Read;
use std::path::PathBuf;
use structural_ast::{Document, Lexical, Parsed};

/// The namespace of structural XML documents.
pub const NAMESPACE: &str = "urn:com.structural:1:0";

/// A request to parse a file.
pub struct ParserRequest<R> {
    /// The base directory for parsing. Parsers are not allowed to access
    /// files or directories in any ancestor of this directory.
    pub base_directory: PathBuf,

    /// The URI of the file, for diagnostic purposes.
    pub file: String,

    /// An open input stream of the file to be parsed.
    pub stream: R,
}

/// Parse a document from the given request.
///
/// Returns the parsed tree, or the accumulated list of parse errors; the
/// error list is never empty on failure.
pub fn parse<R: Read>(mut request: ParserRequest<R>) -> Result<Document<Parsed>, Vec<ParseError>> {
    tracing::debug!(file = %request.file, "parsing document");

    let mut source = String::new();
    if let Err(error) = request.stream.read_to_string(&mut source) {
        return Err(vec![ParseError::fatal(
            Lexical::in_file(0, 0, request.file),
            format!("unable to read input: {}", error),
        )]);
    }

    parse_source(&source, Some(&request.file))
}

/// Parse a document from in-memory XML source.
pub fn parse_source(
    source: &str,
    file: Option<&str>,
) -> Result<Document<Parsed>, Vec<ParseError>> {
    let root = parser::parse_str(source, file).map_err(|error| vec![error])?;
    reader::read_document(&root)
}
