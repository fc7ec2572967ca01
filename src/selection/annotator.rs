use crate::dom::canonical::{
    BADGE_ATTRIBUTE, BADGE_ATTRIBUTE_VALUE, BADGED_CLASS, HOVER_CLASS, SELECTED_CLASS, SELECTION_MODE_CLASS,
};
use crate::dom::{Document, ElementRef, is_protocol_artifact};

/// Class carried by badge nodes, for styling only
pub const BADGE_CLASS: &str = "editor-badge";

/// Projects selection state onto the live document.
///
/// Every method is idempotent and ignores handles that are no longer
/// attached. Only class tokens and badge nodes are ever touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualAnnotator;

impl VisualAnnotator {
    pub fn new() -> Self {
        Self
    }

    /// Outline `el` and attach a badge showing `label`
    pub fn mark_selected(&self, doc: &mut Document, el: ElementRef, label: &str) {
        if !doc.is_attached(el) {
            return;
        }
        doc.add_class(el, SELECTED_CLASS);
        self.remove_badges(doc, el);
        if !has_positioned_style(doc, el) {
            doc.add_class(el, BADGED_CLASS);
        }

        let badge = doc.create_element("span");
        doc.set_attr(badge, "class", BADGE_CLASS);
        doc.set_attr(badge, BADGE_ATTRIBUTE, BADGE_ATTRIBUTE_VALUE);
        if let Err(e) = doc.append_text(badge, label).and_then(|_| doc.append_child(el, badge)) {
            log::warn!("Failed to attach selection badge: {}", e);
            doc.remove(badge);
        }
    }

    pub fn unmark(&self, doc: &mut Document, el: ElementRef) {
        if !doc.is_attached(el) {
            return;
        }
        doc.remove_class(el, SELECTED_CLASS);
        self.remove_badges(doc, el);
    }

    pub fn mark_hover(&self, doc: &mut Document, el: ElementRef) {
        if doc.is_attached(el) {
            doc.add_class(el, HOVER_CLASS);
        }
    }

    pub fn unmark_hover(&self, doc: &mut Document, el: ElementRef) {
        if doc.is_attached(el) {
            doc.remove_class(el, HOVER_CLASS);
        }
    }

    /// Drop the hover outline from every element
    pub fn clear_hover(&self, doc: &mut Document) {
        for el in doc.elements_with_class(HOVER_CLASS) {
            doc.remove_class(el, HOVER_CLASS);
        }
    }

    /// Toggle the crosshair marker on the root content element
    pub fn set_selection_mode_cursor(&self, doc: &mut Document, enabled: bool) {
        let Some(body) = doc.body() else {
            return;
        };
        if enabled {
            doc.add_class(body, SELECTION_MODE_CLASS);
        } else {
            doc.remove_class(body, SELECTION_MODE_CLASS);
        }
    }

    /// Sweep every selection outline, badge and hover mark in the document,
    /// tracked or not
    pub fn clear_all(&self, doc: &mut Document) {
        for el in doc.elements_with_class(SELECTED_CLASS) {
            doc.remove_class(el, SELECTED_CLASS);
        }
        for badge in doc.elements_with_attr(BADGE_ATTRIBUTE, BADGE_ATTRIBUTE_VALUE) {
            if let Some(owner) = doc.parent(badge) {
                doc.remove_class(owner, BADGED_CLASS);
            }
            doc.remove(badge);
        }
        for el in doc.elements_with_class(BADGED_CLASS) {
            doc.remove_class(el, BADGED_CLASS);
        }
        self.clear_hover(doc);
    }

    fn remove_badges(&self, doc: &mut Document, el: ElementRef) {
        for child in doc.element_children(el) {
            if is_protocol_artifact(doc, child) {
                doc.remove(child);
            }
        }
        doc.remove_class(el, BADGED_CLASS);
    }
}

/// Whether an inline style already gives `el` a non-static position
fn has_positioned_style(doc: &Document, el: ElementRef) -> bool {
    doc.attr(el, "style").is_some_and(|style| {
        style.split(';').any(|decl| {
            let mut parts = decl.splitn(2, ':');
            let property = parts.next().unwrap_or_default().trim();
            let value = parts.next().unwrap_or_default().trim();
            property.eq_ignore_ascii_case("position") && !value.is_empty() && !value.eq_ignore_ascii_case("static")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementNode, canonicalize};

    fn page() -> Document {
        Document::from_node(&ElementNode::new("body").with_children(vec![
            ElementNode::new("button").with_attribute("id", "go").with_text("Go"),
            ElementNode::new("div")
                .with_attribute("style", "position: absolute; top: 0")
                .with_text("Panel"),
        ]))
    }

    #[test]
    fn test_mark_selected_adds_one_badge() {
        let mut doc = page();
        let button = doc.find_by_id_attr("go").unwrap();
        let annotator = VisualAnnotator::new();

        annotator.mark_selected(&mut doc, button, "id-aaaaaa");
        annotator.mark_selected(&mut doc, button, "id-aaaaaa");

        assert!(doc.has_class(button, SELECTED_CLASS));
        assert!(doc.has_class(button, BADGED_CLASS));
        let badges = doc.elements_with_attr(BADGE_ATTRIBUTE, BADGE_ATTRIBUTE_VALUE);
        assert_eq!(badges.len(), 1);
        assert_eq!(doc.text_content(badges[0]), "id-aaaaaa");
        assert_eq!(doc.parent(badges[0]), Some(button));
    }

    #[test]
    fn test_positioned_element_skips_badged_class() {
        let mut doc = page();
        let panel = doc.elements()[2];
        VisualAnnotator::new().mark_selected(&mut doc, panel, "1");
        assert!(doc.has_class(panel, SELECTED_CLASS));
        assert!(!doc.has_class(panel, BADGED_CLASS));
    }

    #[test]
    fn test_unmark_restores_markup() {
        let mut doc = page();
        let button = doc.find_by_id_attr("go").unwrap();
        let before = doc.outer_html(button);
        let annotator = VisualAnnotator::new();

        annotator.mark_selected(&mut doc, button, "1");
        annotator.unmark(&mut doc, button);
        annotator.unmark(&mut doc, button);

        assert_eq!(doc.outer_html(button), before);
    }

    #[test]
    fn test_hover_marks() {
        let mut doc = page();
        let button = doc.find_by_id_attr("go").unwrap();
        let annotator = VisualAnnotator::new();

        annotator.mark_hover(&mut doc, button);
        assert!(doc.has_class(button, HOVER_CLASS));
        annotator.unmark_hover(&mut doc, button);
        assert!(!doc.has_class(button, HOVER_CLASS));

        annotator.mark_hover(&mut doc, button);
        annotator.clear_hover(&mut doc);
        assert!(doc.elements_with_class(HOVER_CLASS).is_empty());
    }

    #[test]
    fn test_cursor_toggle() {
        let mut doc = page();
        let body = doc.body().unwrap();
        let annotator = VisualAnnotator::new();

        annotator.set_selection_mode_cursor(&mut doc, true);
        assert!(doc.has_class(body, SELECTION_MODE_CLASS));
        annotator.set_selection_mode_cursor(&mut doc, false);
        assert!(!doc.has_class(body, SELECTION_MODE_CLASS));
    }

    #[test]
    fn test_clear_all_sweeps_untracked_artifacts() {
        let mut doc = page();
        let button = doc.find_by_id_attr("go").unwrap();
        let panel = doc.elements()[2];
        let annotator = VisualAnnotator::new();
        let clean = canonicalize(&doc, button);

        annotator.mark_selected(&mut doc, button, "1");
        annotator.mark_selected(&mut doc, panel, "2");
        annotator.mark_hover(&mut doc, panel);
        annotator.clear_all(&mut doc);

        assert!(doc.elements_with_class(SELECTED_CLASS).is_empty());
        assert!(doc.elements_with_class(BADGED_CLASS).is_empty());
        assert!(doc.elements_with_class(HOVER_CLASS).is_empty());
        assert!(doc.elements_with_attr(BADGE_ATTRIBUTE, BADGE_ATTRIBUTE_VALUE).is_empty());
        assert_eq!(canonicalize(&doc, button), clean);
    }

    #[test]
    fn test_detached_element_is_ignored() {
        let mut doc = page();
        let button = doc.find_by_id_attr("go").unwrap();
        doc.detach(button);

        VisualAnnotator::new().mark_selected(&mut doc, button, "1");
        assert!(!doc.has_class(button, SELECTED_CLASS));
        assert!(doc.element_children(button).is_empty());
    }
}
