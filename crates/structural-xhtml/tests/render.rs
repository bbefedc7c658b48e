/*
 * render.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tests for the XHTML writer: anchors, classes and reference rendering.
 */

use std::sync::Arc;
use structural_ast::{
    BlockId, Document, Footnote, FootnoteReference, Inline, Lexical, Link, LinkContent, Paragraph,
    Parsed, Section, SectionWithContent, SubsectionContent, Term, Text, TypeName,
};
use structural_compiler::compile;
use structural_xhtml::{RenderError, SameDocumentLinks, XhtmlBuilder, render};

fn text(s: &str) -> Inline<Parsed> {
    Inline::Text(Text {
        data: Parsed,
        lexical: Lexical::default(),
        text: s.to_string(),
    })
}

fn paragraph(content: Vec<Inline<Parsed>>) -> SubsectionContent<Parsed> {
    SubsectionContent::Paragraph(Arc::new(Paragraph {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: None,
        content,
    }))
}

fn footnote(id: &str, content: &str) -> SubsectionContent<Parsed> {
    SubsectionContent::Footnote(Arc::new(Footnote {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: BlockId {
            data: Parsed,
            lexical: Lexical::default(),
            value: id.to_string(),
        },
        content: vec![text(content)],
    }))
}

fn document(content: Vec<SubsectionContent<Parsed>>) -> Document<Parsed> {
    Document {
        data: Parsed,
        lexical: Lexical::default(),
        title: "T".to_string(),
        sections: vec![Section::WithContent(Arc::new(SectionWithContent {
            data: Parsed,
            lexical: Lexical::default(),
            type_name: None,
            id: None,
            title: "S".to_string(),
            table_of_contents: true,
            content,
        }))],
    }
}

#[test]
fn paragraphs_carry_numbered_anchors() {
    let compiled = compile(&document(vec![paragraph(vec![text("Hello.")])])).unwrap();
    let links = SameDocumentLinks::new(&compiled.global);
    let builder = XhtmlBuilder::new(&compiled.global, &links);

    let Section::WithContent(section) = &compiled.document.sections[0] else {
        unreachable!()
    };
    let SubsectionContent::Paragraph(para) = &section.content[0] else {
        unreachable!()
    };

    let output = builder.paragraph(para).unwrap().serialize().unwrap();
    insta::assert_snapshot!(
        output,
        @r##"<div><div class="st_paragraph_number"><a id="st_paragraph_1_1" href="#st_paragraph_1_1">1</a></div><p class="st_paragraph_content">Hello.</p></div>"##
    );
}

#[test]
fn footnote_references_render_bracketed_ordinals() {
    let reference = Inline::FootnoteReference(FootnoteReference {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        target: "note.a".to_string(),
    });
    let compiled = compile(&document(vec![
        paragraph(vec![text("See"), reference]),
        footnote("note.a", "the note"),
    ]))
    .unwrap();
    let links = SameDocumentLinks::new(&compiled.global);
    let builder = XhtmlBuilder::new(&compiled.global, &links);

    let Section::WithContent(section) = &compiled.document.sections[0] else {
        unreachable!()
    };
    let SubsectionContent::Paragraph(para) = &section.content[0] else {
        unreachable!()
    };
    let Inline::FootnoteReference(reference) = &para.content[1] else {
        unreachable!()
    };

    let output = builder
        .footnote_reference(reference)
        .unwrap()
        .serialize()
        .unwrap();
    insta::assert_snapshot!(
        output,
        @r##"<span>[<a href="#st_footnote1_2">1</a>]</span>"##
    );
}

#[test]
fn typed_nodes_carry_class_tags() {
    let term = Inline::Term(Term {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: Some(TypeName {
            data: Parsed,
            lexical: Lexical::default(),
            value: "keyword".to_string(),
        }),
        text: vec![Text {
            data: Parsed,
            lexical: Lexical::default(),
            text: "stack".to_string(),
        }],
    });
    let compiled = compile(&document(vec![paragraph(vec![term])])).unwrap();
    let links = SameDocumentLinks::new(&compiled.global);
    let builder = XhtmlBuilder::new(&compiled.global, &links);

    let Section::WithContent(section) = &compiled.document.sections[0] else {
        unreachable!()
    };
    let SubsectionContent::Paragraph(para) = &section.content[0] else {
        unreachable!()
    };
    let Inline::Term(term) = &para.content[0] else {
        unreachable!()
    };

    let output = builder.term(term).serialize().unwrap();
    insta::assert_snapshot!(output, @r#"<span class="st_term keyword">stack</span>"#);
}

#[test]
fn whole_documents_render_to_pages() {
    let compiled = compile(&document(vec![paragraph(vec![text("Hi")])])).unwrap();
    let links = SameDocumentLinks::new(&compiled.global);

    let output = render(&compiled, &links).unwrap();
    insta::assert_snapshot!(
        output,
        @r##"<html xmlns="http://www.w3.org/1999/xhtml"><head><title>T</title></head><body><div class="st_document"><h1 class="st_document_title"><a id="st_document_0" href="#st_document_0">T</a></h1><div><div class="st_section_number"><a id="st_section_1" href="#st_section_1">1</a></div><h2 class="st_section_title">S</h2><div><div class="st_paragraph_number"><a id="st_paragraph_1_1" href="#st_paragraph_1_1">1</a></div><p class="st_paragraph_content">Hi</p></div></div></div></body></html>"##
    );
}

#[test]
fn footnotes_render_in_a_trailing_block() {
    let compiled = compile(&document(vec![
        paragraph(vec![text("body")]),
        footnote("note.a", "the note"),
    ]))
    .unwrap();
    let links = SameDocumentLinks::new(&compiled.global);

    let output = render(&compiled, &links).unwrap();
    assert!(output.contains(r#"<div class="st_footnotes">"#));
    assert!(output.contains(r##"<a id="st_footnote1_2" href="#st_footnote1_2">1</a>"##));
    assert!(output.contains("the note"));
}

#[test]
fn unresolved_links_abort_rendering() {
    let link = Inline::Link(Link {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        target: "nowhere".to_string(),
        content: vec![LinkContent::Text(Text {
            data: Parsed,
            lexical: Lexical::default(),
            text: "missing".to_string(),
        })],
    });
    let compiled = compile(&document(vec![paragraph(vec![link])])).unwrap();
    let links = SameDocumentLinks::new(&compiled.global);

    let error = render(&compiled, &links).unwrap_err();
    assert!(matches!(error, RenderError::Lookup(_)));
}
