//! Document model and structural identity
//!
//! This module provides the arena-backed document the editor operates on and
//! the canonical serialization used to identify elements. It includes:
//! - ElementNode: Owned element description used to seed documents
//! - Document: The live tree, addressed through `ElementRef` handles
//! - canonical: Artifact-free structural snapshot of an element in context
//! - markup: HTML text rendering

pub mod canonical;
pub mod document;
pub mod element;
pub mod markup;

pub use canonical::{ARTIFACT_CLASSES, BADGE_ATTRIBUTE, TARGET_ATTRIBUTE, canonicalize, is_protocol_artifact};
pub use document::{Document, DomNode, ElementRef};
pub use element::ElementNode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag_name, "div");
    }

    #[test]
    fn test_canonical_exports() {
        let doc = Document::from_node(&ElementNode::new("body").with_children(vec![
            ElementNode::new("span").with_attribute(BADGE_ATTRIBUTE, "1"),
            ElementNode::new("p").with_text("x"),
        ]));
        let badge = doc.element_at(1).unwrap();
        let p = doc.element_at(2).unwrap();
        assert!(is_protocol_artifact(&doc, badge));
        assert!(!is_protocol_artifact(&doc, p));
        assert!(ARTIFACT_CLASSES.contains(&"editor-hover"));
        assert_eq!(canonicalize(&doc, p), format!("<body><p {}=\"this\">x</p></body>", TARGET_ATTRIBUTE));
    }

    #[test]
    fn test_document_export() {
        let doc = Document::from_node(&ElementNode::new("body"));
        assert!(doc.body().is_some());
    }
}
