use crate::dom::element::ElementNode;
use crate::dom::markup;
use crate::error::{EditorError, Result};
use indextree::{Arena, NodeId};

/// Payload stored in each arena slot
#[derive(Debug, Clone)]
pub enum DomNode {
    Document,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

impl DomNode {
    fn element(tag: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        DomNode::Element {
            tag: tag.into().to_ascii_lowercase(),
            attrs,
        }
    }
}

/// Non-owning handle to a node of a [`Document`].
///
/// Handles stay valid as plain values after the node is detached or removed;
/// every `Document` method treats such a handle as absent instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(NodeId);

impl ElementRef {
    pub(crate) fn from_node_id(id: NodeId) -> Self {
        Self(id)
    }

    pub(crate) fn node_id(self) -> NodeId {
        self.0
    }
}

/// The live document tree
#[derive(Debug, Clone)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding nothing but the document node
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::Document);
        Self { arena, root }
    }

    /// Build a document whose top-level element is `root`
    pub fn from_node(root: &ElementNode) -> Self {
        let mut document = Self::new();
        let top = document.build(root);
        document.root.append(top, &mut document.arena);
        document
    }

    /// Load a document from an `ElementNode` JSON fixture
    pub fn from_json(json: &str) -> Result<Self> {
        let root: ElementNode = serde_json::from_str(json)?;
        Ok(Self::from_node(&root))
    }

    fn build(&mut self, node: &ElementNode) -> NodeId {
        let id = self
            .arena
            .new_node(DomNode::element(&node.tag_name, node.attributes.clone()));
        if let Some(text) = &node.text_content {
            let text_id = self.arena.new_node(DomNode::Text(text.clone()));
            id.append(text_id, &mut self.arena);
        }
        for child in &node.children {
            let child_id = self.build(child);
            id.append(child_id, &mut self.arena);
        }
        id
    }

    /// The node payload, or `None` for a removed handle
    pub(crate) fn node(&self, id: NodeId) -> Option<&DomNode> {
        if id.is_removed(&self.arena) {
            return None;
        }
        self.arena.get(id).map(|n| n.get())
    }

    /// Child node ids, empty for a removed handle
    pub(crate) fn child_ids(&self, id: NodeId) -> Vec<NodeId> {
        if id.is_removed(&self.arena) {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    fn is_element(&self, id: NodeId) -> bool {
        matches!(self.node(id), Some(DomNode::Element { .. }))
    }

    fn attrs_mut(&mut self, el: ElementRef) -> Option<&mut Vec<(String, String)>> {
        if el.0.is_removed(&self.arena) {
            return None;
        }
        match self.arena.get_mut(el.0).map(|n| n.get_mut()) {
            Some(DomNode::Element { attrs, .. }) => Some(attrs),
            _ => None,
        }
    }

    /// The top-level element (usually `html`)
    pub fn document_element(&self) -> Option<ElementRef> {
        self.root
            .children(&self.arena)
            .find(|&id| self.is_element(id))
            .map(ElementRef)
    }

    /// The root content element: `body` at the top level or directly under `html`
    pub fn body(&self) -> Option<ElementRef> {
        for top in self.root.children(&self.arena) {
            match self.tag_name(ElementRef(top)) {
                Some("body") => return Some(ElementRef(top)),
                Some("html") => {
                    if let Some(body) = top
                        .children(&self.arena)
                        .find(|&c| self.tag_name(ElementRef(c)) == Some("body"))
                    {
                        return Some(ElementRef(body));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> ElementRef {
        ElementRef(self.arena.new_node(DomNode::element(tag, Vec::new())))
    }

    /// Append a text node to `parent`
    pub fn append_text(&mut self, parent: ElementRef, text: &str) -> Result<()> {
        let text_id = self.arena.new_node(DomNode::Text(text.to_string()));
        self.attach(parent, text_id)
    }

    /// Append `child` (detaching it from any previous parent) to `parent`
    pub fn append_child(&mut self, parent: ElementRef, child: ElementRef) -> Result<()> {
        if child.0.is_removed(&self.arena) {
            return Err(EditorError::ElementNotFound("child node has been removed".to_string()));
        }
        child.0.detach(&mut self.arena);
        self.attach(parent, child.0)
    }

    fn attach(&mut self, parent: ElementRef, child: NodeId) -> Result<()> {
        if !self.is_element(parent.0) {
            return Err(EditorError::ElementNotFound("parent is not a live element".to_string()));
        }
        parent
            .0
            .checked_append(child, &mut self.arena)
            .map_err(|e| EditorError::InvalidDocument(format!("Failed to append node: {}", e)))
    }

    /// Unlink a subtree from the tree, keeping its nodes alive
    pub fn detach(&mut self, el: ElementRef) {
        if !el.0.is_removed(&self.arena) {
            el.0.detach(&mut self.arena);
        }
    }

    /// Remove a subtree, invalidating every handle into it
    pub fn remove(&mut self, el: ElementRef) {
        if !el.0.is_removed(&self.arena) {
            el.0.remove_subtree(&mut self.arena);
        }
    }

    /// Whether the handle is live and connected to the document node
    pub fn is_attached(&self, el: ElementRef) -> bool {
        if el.0.is_removed(&self.arena) {
            return false;
        }
        el.0.ancestors(&self.arena).last() == Some(self.root)
    }

    /// Parent element, `None` at the top level or for stale handles
    pub fn parent(&self, el: ElementRef) -> Option<ElementRef> {
        if el.0.is_removed(&self.arena) {
            return None;
        }
        self.arena
            .get(el.0)
            .and_then(|n| n.parent())
            .filter(|&p| self.is_element(p))
            .map(ElementRef)
    }

    /// Element children in order
    pub fn element_children(&self, el: ElementRef) -> Vec<ElementRef> {
        self.child_ids(el.0)
            .into_iter()
            .filter(|&id| self.is_element(id))
            .map(ElementRef)
            .collect()
    }

    pub fn tag_name(&self, el: ElementRef) -> Option<&str> {
        match self.node(el.0) {
            Some(DomNode::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attributes(&self, el: ElementRef) -> &[(String, String)] {
        match self.node(el.0) {
            Some(DomNode::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn attr(&self, el: ElementRef, name: &str) -> Option<&str> {
        self.attributes(el)
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, appending it when new
    pub fn set_attr(&mut self, el: ElementRef, name: &str, value: &str) {
        if let Some(attrs) = self.attrs_mut(el) {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, el: ElementRef, name: &str) {
        if let Some(attrs) = self.attrs_mut(el) {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn has_class(&self, el: ElementRef, class_name: &str) -> bool {
        self.attr(el, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    /// Add a class token; no-op when already present
    pub fn add_class(&mut self, el: ElementRef, class_name: &str) {
        if !self.is_element(el.0) || self.has_class(el, class_name) {
            return;
        }
        let classes = match self.attr(el, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class_name)
            }
            _ => class_name.to_string(),
        };
        self.set_attr(el, "class", &classes);
    }

    /// Remove a class token, dropping the attribute once it is empty
    pub fn remove_class(&mut self, el: ElementRef, class_name: &str) {
        if !self.has_class(el, class_name) {
            return;
        }
        let remaining = self
            .attr(el, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect::<Vec<_>>()
            .join(" ");
        if remaining.is_empty() {
            self.remove_attr(el, "class");
        } else {
            self.set_attr(el, "class", &remaining);
        }
    }

    /// Concatenated text of the element and its descendants
    pub fn text_content(&self, el: ElementRef) -> String {
        if el.0.is_removed(&self.arena) {
            return String::new();
        }
        el.0.descendants(&self.arena)
            .filter_map(|id| match self.node(id) {
                Some(DomNode::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Every attached element in document order
    pub fn elements(&self) -> Vec<ElementRef> {
        self.root
            .descendants(&self.arena)
            .filter(|&id| self.is_element(id))
            .map(ElementRef)
            .collect()
    }

    /// Attached elements carrying `class_name`
    pub fn elements_with_class(&self, class_name: &str) -> Vec<ElementRef> {
        self.elements()
            .into_iter()
            .filter(|&el| self.has_class(el, class_name))
            .collect()
    }

    /// Attached elements whose attribute `name` equals `value`
    pub fn elements_with_attr(&self, name: &str, value: &str) -> Vec<ElementRef> {
        self.elements()
            .into_iter()
            .filter(|&el| self.attr(el, name) == Some(value))
            .collect()
    }

    /// First element whose `id` attribute matches
    pub fn find_by_id_attr(&self, id: &str) -> Option<ElementRef> {
        self.elements()
            .into_iter()
            .find(|&el| self.attr(el, "id") == Some(id))
    }

    /// Element at position `index` in document order
    pub fn element_at(&self, index: usize) -> Option<ElementRef> {
        self.elements().into_iter().nth(index)
    }

    pub fn count_elements(&self) -> usize {
        self.elements().len()
    }

    /// Markup of the element and its subtree, as-is
    pub fn outer_html(&self, el: ElementRef) -> String {
        let mut out = String::new();
        markup::write_subtree(self, el.0, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_document() -> Document {
        let page = ElementNode::new("html").with_children(vec![
            ElementNode::new("head").with_children(vec![ElementNode::new("title").with_text("Demo")]),
            ElementNode::new("body").with_children(vec![
                ElementNode::new("header").with_children(vec![
                    ElementNode::new("button")
                        .with_attribute("id", "nav-btn")
                        .with_text("Menu"),
                ]),
                ElementNode::new("main").with_children(vec![
                    ElementNode::new("a").with_attribute("href", "/page").with_text("Click here"),
                    ElementNode::new("div").with_attribute("class", "content").with_text("Some text"),
                ]),
            ]),
        ]);
        Document::from_node(&page)
    }

    #[test]
    fn test_body_lookup() {
        let doc = create_test_document();
        let body = doc.body().unwrap();
        assert_eq!(doc.tag_name(body), Some("body"));
        assert_eq!(doc.element_children(body).len(), 2);
        assert_eq!(doc.tag_name(doc.document_element().unwrap()), Some("html"));
    }

    #[test]
    fn test_body_missing() {
        let doc = Document::from_node(&ElementNode::new("section"));
        assert!(doc.body().is_none());
    }

    #[test]
    fn test_elements_in_document_order() {
        let doc = create_test_document();
        let tags: Vec<_> = doc
            .elements()
            .into_iter()
            .map(|el| doc.tag_name(el).unwrap().to_string())
            .collect();
        assert_eq!(
            tags,
            vec!["html", "head", "title", "body", "header", "button", "main", "a", "div"]
        );
        assert_eq!(doc.count_elements(), 9);
        assert_eq!(doc.element_at(5), doc.find_by_id_attr("nav-btn"));
    }

    #[test]
    fn test_class_tokens() {
        let mut doc = create_test_document();
        let div = doc.elements_with_class("content")[0];

        doc.add_class(div, "editor-selected");
        doc.add_class(div, "editor-selected");
        assert_eq!(doc.attr(div, "class"), Some("content editor-selected"));

        doc.remove_class(div, "editor-selected");
        assert_eq!(doc.attr(div, "class"), Some("content"));

        let link = doc.elements_with_attr("href", "/page")[0];
        doc.add_class(link, "editor-hover");
        doc.remove_class(link, "editor-hover");
        assert_eq!(doc.attr(link, "class"), None);
    }

    #[test]
    fn test_detached_handles_are_inert() {
        let mut doc = create_test_document();
        let button = doc.find_by_id_attr("nav-btn").unwrap();
        assert!(doc.is_attached(button));

        doc.detach(button);
        assert!(!doc.is_attached(button));
        assert!(doc.find_by_id_attr("nav-btn").is_none());

        let link = doc.elements_with_attr("href", "/page")[0];
        doc.remove(link);
        assert!(!doc.is_attached(link));
        assert_eq!(doc.tag_name(link), None);
        doc.add_class(link, "editor-selected");
        doc.set_attr(link, "title", "gone");
        assert!(doc.attributes(link).is_empty());
        assert!(doc.parent(link).is_none());
        assert_eq!(doc.outer_html(link), "");
    }

    #[test]
    fn test_append_child_and_text() {
        let mut doc = create_test_document();
        let body = doc.body().unwrap();
        let span = doc.create_element("SPAN");
        assert!(!doc.is_attached(span));

        doc.append_child(body, span).unwrap();
        doc.append_text(span, "hi").unwrap();

        assert!(doc.is_attached(span));
        assert_eq!(doc.tag_name(span), Some("span"));
        assert_eq!(doc.parent(span), Some(body));
        assert_eq!(doc.text_content(span), "hi");
    }

    #[test]
    fn test_from_json() {
        let doc = Document::from_json(r#"{"tag_name":"body","children":[{"tag_name":"p","text_content":"x"}]}"#)
            .unwrap();
        assert_eq!(doc.outer_html(doc.body().unwrap()), "<body><p>x</p></body>");

        assert!(matches!(
            Document::from_json("not json"),
            Err(EditorError::Serialization(_))
        ));
    }
}
