//! Anchor identifiers and CSS class names.
//!
//! The naming scheme is a compatibility surface: anchors are
//! `st_<kind>_<number components joined by "_">` (footnotes, for
//! historical reasons, omit the underscore between the kind token and the
//! number), and a node with a user-supplied type tag receives a class of
//! `st_<snake cased node name> <tag>`.

use structural_ast::{BlockKind, ContentNumber, TypeName};
use structural_compiler::CompiledLocal;

/// The anchor identifier of a block with the given kind and number.
pub fn anchor_for(kind: BlockKind, number: &ContentNumber) -> String {
    let prefix = match kind {
        BlockKind::Document => "st_document_",
        BlockKind::Section => "st_section_",
        BlockKind::Subsection => "st_subsection_",
        BlockKind::Paragraph => "st_paragraph_",
        BlockKind::FormalItem => "st_formal_",
        BlockKind::Footnote => "st_footnote",
    };
    format!("{}{}", prefix, underscored(number))
}

fn underscored(number: &ContentNumber) -> String {
    number
        .components()
        .iter()
        .map(|component| component.to_string())
        .collect::<Vec<_>>()
        .join("_")
}

/// The class attribute value for a node carrying a user type tag: the
/// node's base class followed by the tag. Untyped nodes get no class.
pub fn class_for(base: &'static str, type_name: Option<&TypeName<CompiledLocal>>) -> Option<String> {
    type_name.map(|type_name| format!("{} {}", base, type_name.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_join_components_with_underscores() {
        let number = ContentNumber::parse("1.2.3").unwrap();
        assert_eq!(
            anchor_for(BlockKind::Paragraph, &number),
            "st_paragraph_1_2_3"
        );
        assert_eq!(anchor_for(BlockKind::Section, &number), "st_section_1_2_3");
        assert_eq!(
            anchor_for(BlockKind::Subsection, &number),
            "st_subsection_1_2_3"
        );
        assert_eq!(anchor_for(BlockKind::FormalItem, &number), "st_formal_1_2_3");
        assert_eq!(
            anchor_for(BlockKind::Document, &ContentNumber::parse("0").unwrap()),
            "st_document_0"
        );
    }

    #[test]
    fn footnote_anchors_have_no_separating_underscore() {
        let number = ContentNumber::parse("1.1.2").unwrap();
        assert_eq!(anchor_for(BlockKind::Footnote, &number), "st_footnote1_1_2");
    }

    #[test]
    fn classes_appear_only_with_type_tags() {
        assert_eq!(class_for("st_paragraph", None), None);
    }
}
