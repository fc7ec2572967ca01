//! HTML text rendering for document subtrees

use crate::dom::document::{Document, DomNode};
use indextree::NodeId;

const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

pub fn write_open_tag<'a>(out: &mut String, tag: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) {
    out.push('<');
    out.push_str(tag);
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    out.push('>');
}

pub fn write_close_tag(out: &mut String, tag: &str) {
    if is_void(tag) {
        return;
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

pub fn write_text(out: &mut String, text: &str) {
    escape_into(out, text, false);
}

fn escape_into(out: &mut String, raw: &str, in_attribute: bool) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Render a node and everything below it. Removed nodes render as nothing.
pub fn write_subtree(doc: &Document, id: NodeId, out: &mut String) {
    match doc.node(id) {
        Some(DomNode::Element { tag, attrs }) => {
            write_open_tag(out, tag, attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            for child in doc.child_ids(id) {
                write_subtree(doc, child, out);
            }
            write_close_tag(out, tag);
        }
        Some(DomNode::Text(text)) => write_text(out, text),
        Some(DomNode::Document) => {
            for child in doc.child_ids(id) {
                write_subtree(doc, child, out);
            }
        }
        None => {}
    }
}
