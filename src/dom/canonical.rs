//! Canonical serialization of an element in its structural context.
//!
//! The snapshot is the chain from the root content element down to the
//! target. Every on-path ancestor lists its element children, siblings off
//! the path appear as bare open/close tags, and the target is rendered in
//! full with `data-target="this"`. Everything the editor injects into the
//! live page (marker classes and badge nodes) is filtered out at every depth,
//! so selecting an element never changes its snapshot.

use crate::dom::document::{Document, DomNode, ElementRef};
use crate::dom::markup::{write_close_tag, write_open_tag, write_text};

pub const SELECTED_CLASS: &str = "editor-selected";
pub const BADGED_CLASS: &str = "editor-selected-badged";
pub const HOVER_CLASS: &str = "editor-hover";
pub const SELECTION_MODE_CLASS: &str = "editor-element-selection-mode";

/// Classes the editor adds to live elements
pub const ARTIFACT_CLASSES: [&str; 4] = [SELECTED_CLASS, BADGED_CLASS, HOVER_CLASS, SELECTION_MODE_CLASS];

/// Attribute (with value `"1"`) carried by injected badge nodes
pub const BADGE_ATTRIBUTE: &str = "data-editor-badge";
pub const BADGE_ATTRIBUTE_VALUE: &str = "1";

/// Attribute (with value `"this"`) marking the target inside a snapshot
pub const TARGET_ATTRIBUTE: &str = "data-target";
pub const TARGET_ATTRIBUTE_VALUE: &str = "this";

/// Whether `el` is a node injected by the editor
pub fn is_protocol_artifact(doc: &Document, el: ElementRef) -> bool {
    doc.attr(el, BADGE_ATTRIBUTE) == Some(BADGE_ATTRIBUTE_VALUE)
}

/// Produce the canonical serialization of `target`.
///
/// Reads the document only. A stale handle yields an empty string. Targets
/// that are not strictly inside the root content element (the body itself,
/// `head` content, detached subtrees, documents without a body) fall back to
/// their own artifact-free markup.
pub fn canonicalize(doc: &Document, target: ElementRef) -> String {
    let mut out = String::new();
    if doc.tag_name(target).is_none() {
        return out;
    }

    match path_from_body(doc, target) {
        Some((body, path)) if !path.is_empty() => write_path(doc, body, &path, &mut out),
        _ => write_deep(doc, target, true, &mut out),
    }
    out
}

/// Ancestor chain below the body, top-down, ending with `target`
fn path_from_body(doc: &Document, target: ElementRef) -> Option<(ElementRef, Vec<ElementRef>)> {
    let body = doc.body()?;
    let mut path = Vec::new();
    let mut current = target;
    while current != body {
        path.push(current);
        current = doc.parent(current)?;
    }
    path.reverse();
    Some((body, path))
}

fn write_path(doc: &Document, parent: ElementRef, remaining: &[ElementRef], out: &mut String) {
    let Some(tag) = doc.tag_name(parent) else {
        return;
    };
    let attrs = stripped_attributes(doc, parent);
    write_open_tag(out, tag, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    for child in doc.element_children(parent) {
        if is_protocol_artifact(doc, child) {
            continue;
        }
        match remaining.split_first() {
            Some((&next, [])) if next == child => write_deep(doc, child, true, out),
            Some((&next, rest)) if next == child => write_path(doc, child, rest, out),
            _ => write_shallow(doc, child, out),
        }
    }

    write_close_tag(out, tag);
}

fn write_shallow(doc: &Document, el: ElementRef, out: &mut String) {
    let Some(tag) = doc.tag_name(el) else {
        return;
    };
    let attrs = stripped_attributes(doc, el);
    write_open_tag(out, tag, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    write_close_tag(out, tag);
}

fn write_deep(doc: &Document, el: ElementRef, is_target: bool, out: &mut String) {
    let Some(tag) = doc.tag_name(el) else {
        return;
    };
    let mut attrs = stripped_attributes(doc, el);
    if is_target {
        match attrs.iter_mut().find(|(k, _)| k == TARGET_ATTRIBUTE) {
            Some(slot) => slot.1 = TARGET_ATTRIBUTE_VALUE.to_string(),
            None => attrs.push((TARGET_ATTRIBUTE.to_string(), TARGET_ATTRIBUTE_VALUE.to_string())),
        }
    }
    write_open_tag(out, tag, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    for child in doc.child_ids(el.node_id()) {
        match doc.node(child) {
            Some(DomNode::Text(text)) => write_text(out, text),
            Some(DomNode::Element { .. }) => {
                let child = ElementRef::from_node_id(child);
                if !is_protocol_artifact(doc, child) {
                    write_deep(doc, child, false, out);
                }
            }
            _ => {}
        }
    }

    write_close_tag(out, tag);
}

/// Attributes with marker classes removed; an emptied `class` is omitted
fn stripped_attributes(doc: &Document, el: ElementRef) -> Vec<(String, String)> {
    doc.attributes(el)
        .iter()
        .filter_map(|(name, value)| {
            if name != "class" {
                return Some((name.clone(), value.clone()));
            }
            let classes = value
                .split_whitespace()
                .filter(|c| !ARTIFACT_CLASSES.contains(c))
                .collect::<Vec<_>>()
                .join(" ");
            (!classes.is_empty()).then(|| (name.clone(), classes))
        })
        .collect()
}
