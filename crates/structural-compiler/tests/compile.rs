/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests for the compilation driver.
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use structural_ast::{
    BlockId, Document, Footnote, Inline, Lexical, Paragraph, Parsed, Section, SectionWithContent,
    SectionWithSections, SectionWithSubsections, Subsection, SubsectionContent, Table, TableBody,
    TableCell, TableColumnName, TableHeader, TableRow, Text,
};
use structural_compiler::{BlockRef, LookupError, compile};

fn text(s: &str) -> Inline<Parsed> {
    Inline::Text(Text {
        data: Parsed,
        lexical: Lexical::default(),
        text: s.to_string(),
    })
}

fn block_id(value: &str) -> BlockId<Parsed> {
    BlockId {
        data: Parsed,
        lexical: Lexical::default(),
        value: value.to_string(),
    }
}

fn paragraph(content: &str) -> SubsectionContent<Parsed> {
    SubsectionContent::Paragraph(Arc::new(Paragraph {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: None,
        content: vec![text(content)],
    }))
}

fn paragraph_with_id(content: &str, id: &str) -> SubsectionContent<Parsed> {
    SubsectionContent::Paragraph(Arc::new(Paragraph {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: Some(block_id(id)),
        content: vec![text(content)],
    }))
}

fn footnote(id: &str, content: &str) -> SubsectionContent<Parsed> {
    SubsectionContent::Footnote(Arc::new(Footnote {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: block_id(id),
        content: vec![text(content)],
    }))
}

fn subsection(title: &str, content: Vec<SubsectionContent<Parsed>>) -> Arc<Subsection<Parsed>> {
    Arc::new(Subsection {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: None,
        title: title.to_string(),
        content,
    })
}

fn section_with_subsections(
    title: &str,
    id: Option<&str>,
    subsections: Vec<Arc<Subsection<Parsed>>>,
) -> Section<Parsed> {
    Section::WithSubsections(Arc::new(SectionWithSubsections {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: id.map(block_id),
        title: title.to_string(),
        table_of_contents: true,
        subsections,
    }))
}

fn section_with_content(
    title: &str,
    id: Option<&str>,
    content: Vec<SubsectionContent<Parsed>>,
) -> Section<Parsed> {
    Section::WithContent(Arc::new(SectionWithContent {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: id.map(block_id),
        title: title.to_string(),
        table_of_contents: true,
        content,
    }))
}

fn document(sections: Vec<Section<Parsed>>) -> Document<Parsed> {
    Document {
        data: Parsed,
        lexical: Lexical::default(),
        title: "Test Document".to_string(),
        sections,
    }
}

fn table_cell(content: Vec<Inline<Parsed>>) -> TableCell<Parsed> {
    TableCell {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        content,
    }
}

fn table_row(cells: Vec<TableCell<Parsed>>) -> TableRow<Parsed> {
    TableRow {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        cells,
    }
}

fn table_with_columns(columns: &[&str], rows: Vec<TableRow<Parsed>>) -> Table<Parsed> {
    Table {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        header: Some(TableHeader {
            data: Parsed,
            lexical: Lexical::default(),
            type_name: None,
            names: columns
                .iter()
                .map(|name| TableColumnName {
                    data: Parsed,
                    lexical: Lexical::default(),
                    type_name: None,
                    name: name.to_string(),
                })
                .collect(),
        }),
        body: TableBody {
            data: Parsed,
            lexical: Lexical::default(),
            type_name: None,
            rows,
        },
    }
}

/// A document with three sections of three subsections of one paragraph.
fn three_by_three() -> Document<Parsed> {
    let sections = (1..=3)
        .map(|s| {
            let subsections = (1..=3)
                .map(|ss| {
                    subsection(
                        &format!("Subsection {}.{}", s, ss),
                        vec![paragraph("content")],
                    )
                })
                .collect();
            section_with_subsections(&format!("Section {}", s), None, subsections)
        })
        .collect();
    document(sections)
}

#[test]
fn numbering_three_by_three() {
    let compiled = compile(&three_by_three()).expect("compilation succeeds");
    let doc = &compiled.document;
    assert_eq!(doc.data.number.to_human_string(), "0");

    for (s, section) in doc.sections.iter().enumerate() {
        let section = match section {
            Section::WithSubsections(section) => section,
            _ => unreachable!("built with subsections"),
        };
        assert_eq!(
            section.data.number.to_human_string(),
            format!("{}", s + 1)
        );
        for (ss, sub) in section.subsections.iter().enumerate() {
            assert_eq!(
                sub.data.number.to_human_string(),
                format!("{}.{}", s + 1, ss + 1)
            );
            let SubsectionContent::Paragraph(para) = &sub.content[0] else {
                unreachable!("built with paragraphs");
            };
            assert_eq!(
                para.data.number.to_human_string(),
                format!("{}.{}.1", s + 1, ss + 1)
            );
        }
    }
}

#[test]
fn numbering_deeply_nested() {
    // Section, nested section, subsection-holding section, subsection,
    // paragraph: the innermost paragraph numbers 1.1.1.1.1.
    let section_with_sections = |title: &str, sections| {
        Section::WithSections(Arc::new(SectionWithSections {
            data: Parsed,
            lexical: Lexical::default(),
            type_name: None,
            id: None,
            title: title.to_string(),
            table_of_contents: true,
            sections,
        }))
    };
    let doc = document(vec![section_with_sections(
        "Outer",
        vec![section_with_sections(
            "Middle",
            vec![section_with_subsections(
                "Holder",
                None,
                vec![subsection("Leaf", vec![paragraph("deep")])],
            )],
        )],
    )]);

    let compiled = compile(&doc).expect("compilation succeeds");
    let Section::WithSections(outer) = &compiled.document.sections[0] else {
        unreachable!()
    };
    let Section::WithSections(middle) = &outer.sections[0] else {
        unreachable!()
    };
    let Section::WithSubsections(holder) = &middle.sections[0] else {
        unreachable!()
    };
    let sub = &holder.subsections[0];
    let SubsectionContent::Paragraph(para) = &sub.content[0] else {
        unreachable!()
    };

    assert_eq!(outer.data.number.to_human_string(), "1");
    assert_eq!(middle.data.number.to_human_string(), "1.1");
    assert_eq!(holder.data.number.to_human_string(), "1.1.1");
    assert_eq!(sub.data.number.to_human_string(), "1.1.1.1");
    assert_eq!(para.data.number.to_human_string(), "1.1.1.1.1");
}

#[test]
fn compilation_preserves_content() {
    let parsed = three_by_three();
    let compiled = compile(&parsed).expect("compilation succeeds");
    assert!(
        parsed == compiled.document,
        "compiled document must be content-equal to its source"
    );
}

#[test]
fn parent_handles_point_at_containers() {
    let compiled = compile(&three_by_three()).expect("compilation succeeds");
    let doc = &compiled.document;
    assert_eq!(doc.data.parent, None);

    for section in &doc.sections {
        let Section::WithSubsections(section) = section else {
            unreachable!()
        };
        assert_eq!(section.data.parent, Some(doc.data.node));
        for sub in &section.subsections {
            assert_eq!(sub.data.parent, Some(section.data.node));
            let SubsectionContent::Paragraph(para) = &sub.content[0] else {
                unreachable!()
            };
            assert_eq!(para.data.parent, Some(sub.data.node));
            let Inline::Text(leaf) = &para.content[0] else {
                unreachable!()
            };
            assert_eq!(leaf.data.parent, Some(para.data.node));
        }
    }
}

#[test]
fn footnotes_are_ordered_across_nesting() {
    let doc = document(vec![
        section_with_subsections(
            "One",
            None,
            vec![
                subsection("A", vec![footnote("f1", "first"), paragraph("p")]),
                subsection("B", vec![footnote("f2", "second")]),
            ],
        ),
        section_with_content("Two", None, vec![footnote("f3", "third")]),
    ]);

    let compiled = compile(&doc).expect("compilation succeeds");
    let ids: Vec<&str> = compiled
        .global
        .footnotes()
        .iter()
        .map(|footnote| footnote.id.value.as_str())
        .collect();
    assert_eq!(ids, vec!["f1", "f2", "f3"]);

    for (index, footnote) in compiled.global.footnotes().iter().enumerate() {
        assert_eq!(
            compiled.global.footnote_index_of(footnote).unwrap(),
            (index + 1).into()
        );
    }
}

#[test]
fn bad_table_rows_all_reported() {
    let table = table_with_columns(
        &["Name", "Value"],
        vec![
            table_row(vec![table_cell(vec![text("a")])]),
            table_row(vec![
                table_cell(vec![text("b")]),
                table_cell(vec![text("c")]),
            ]),
            table_row(vec![
                table_cell(vec![text("d")]),
                table_cell(vec![text("e")]),
                table_cell(vec![text("f")]),
            ]),
            table_row(vec![]),
        ],
    );
    let para = SubsectionContent::Paragraph(Arc::new(Paragraph {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: None,
        content: vec![Inline::Table(table)],
    }));
    let doc = document(vec![section_with_content("S", None, vec![para])]);

    let errors = compile(&doc).expect_err("compilation fails");
    assert_eq!(errors.len(), 3, "one error per non-conforming row");
    for error in &errors {
        assert!(error.message.contains("number of columns in table row"));
        assert!(error.message.contains("expected: 2 columns"));
    }
}

#[test]
fn typed_lookup_reports_mismatch() {
    let doc = document(vec![section_with_content(
        "S",
        Some("sec.main"),
        vec![paragraph("p")],
    )]);
    let compiled = compile(&doc).expect("compilation succeeds");

    assert!(compiled.global.find_section_for("sec.main").is_ok());

    let error = compiled
        .global
        .find_paragraph_for("sec.main")
        .expect_err("section is not a paragraph");
    let LookupError::TypeMismatch {
        id,
        expected,
        received,
    } = &error
    else {
        panic!("expected a type mismatch, got {error:?}");
    };
    assert_eq!(id, "sec.main");
    assert_eq!(expected.to_string(), "paragraph");
    assert_eq!(received.to_string(), "section");
}

#[test]
fn lookup_of_unknown_id_fails() {
    let compiled = compile(&three_by_three()).expect("compilation succeeds");
    assert!(matches!(
        compiled.global.find_block_for("missing"),
        Err(LookupError::NotFound { .. })
    ));
}

#[test]
fn registered_blocks_resolve_with_their_numbers() {
    let doc = document(vec![section_with_content(
        "S",
        None,
        vec![paragraph_with_id("target", "para.intro")],
    )]);
    let compiled = compile(&doc).expect("compilation succeeds");

    let block = compiled.global.find_block_for("para.intro").unwrap();
    let BlockRef::Paragraph(para) = block else {
        panic!("expected a paragraph");
    };
    assert_eq!(para.data.number.to_human_string(), "1.1");

    let direct = compiled.global.find_paragraph_for("para.intro").unwrap();
    assert_eq!(direct.data.node, para.data.node);
}

#[test]
fn duplicate_identifiers_are_compile_errors() {
    let doc = document(vec![section_with_content(
        "S",
        None,
        vec![
            paragraph_with_id("first", "dup"),
            paragraph_with_id("second", "dup"),
            paragraph_with_id("third", "dup"),
        ],
    )]);

    let errors = compile(&doc).expect_err("duplicates fail the compile");
    assert_eq!(errors.len(), 2, "one error per later duplicate");
    for error in &errors {
        assert!(error.message.contains("already been declared"));
        assert!(error.message.contains("dup"));
    }
}

#[test]
fn nested_tables_fail_the_compile() {
    let inner = table_with_columns(&["C"], vec![table_row(vec![table_cell(vec![text("x")])])]);
    let outer = table_with_columns(
        &["C"],
        vec![table_row(vec![table_cell(vec![Inline::Table(inner)])])],
    );
    let para = SubsectionContent::Paragraph(Arc::new(Paragraph {
        data: Parsed,
        lexical: Lexical::default(),
        type_name: None,
        id: None,
        content: vec![Inline::Table(outer)],
    }));
    let doc = document(vec![section_with_content("S", None, vec![para])]);

    let errors = compile(&doc).expect_err("nested tables fail");
    assert!(
        errors
            .iter()
            .any(|error| error.message.contains("nested inside table cells"))
    );
}

#[test]
fn errors_do_not_stop_sibling_processing() {
    // Two sections, each with its own structural error: both must appear.
    let bad_table = |name: &str| {
        SubsectionContent::Paragraph(Arc::new(Paragraph {
            data: Parsed,
            lexical: Lexical::default(),
            type_name: None,
            id: None,
            content: vec![Inline::Table(table_with_columns(
                &[name, "V"],
                vec![table_row(vec![table_cell(vec![text("only one")])])],
            ))],
        }))
    };
    let doc = document(vec![
        section_with_content("One", None, vec![bad_table("A")]),
        section_with_content("Two", None, vec![bad_table("B")]),
    ]);

    let errors = compile(&doc).expect_err("compilation fails");
    assert_eq!(errors.len(), 2);
}

#[test]
fn empty_document_compiles() {
    let compiled = compile(&document(vec![])).expect("compilation succeeds");
    assert_eq!(compiled.document.data.number.to_human_string(), "0");
    assert!(compiled.global.footnotes().is_empty());
}
