use crate::dom::{Document, ElementRef, canonicalize, is_protocol_artifact};
use crate::identity::{ElementId, identify};
use crate::protocol::message::{
    ElementSelectionPayload, OutboundMessage, SelectedElement, SelectionRebuiltPayload,
};
use crate::selection::annotator::VisualAnnotator;
use crate::selection::store::{SelectionEntry, SelectionStore};
use crate::session::{EditorSession, SessionState};
use std::collections::HashSet;

/// Everything one engine operation may touch
pub struct SelectionContext<'a> {
    pub session: &'a mut EditorSession,
    pub document: &'a mut Document,
    /// Notifications produced by the operation, in emission order
    pub outbox: &'a mut Vec<OutboundMessage>,
}

impl<'a> SelectionContext<'a> {
    pub fn new(
        session: &'a mut EditorSession,
        document: &'a mut Document,
        outbox: &'a mut Vec<OutboundMessage>,
    ) -> Self {
        Self {
            session,
            document,
            outbox,
        }
    }

    fn emit(&mut self, message: OutboundMessage) {
        self.outbox.push(message);
    }

    fn emit_state(&mut self) {
        let status = self.session.state.as_str();
        self.emit(OutboundMessage::status(status));
    }

    fn transition(&mut self, next: SessionState) {
        if self.session.state != next {
            log::debug!("Editor state {} -> {}", self.session.state, next);
        }
        self.session.state = next;
    }
}

/// Selection state machine: owns the selection set and keeps the document's
/// annotations in line with it
#[derive(Debug, Clone, Default)]
pub struct SelectionEngine {
    store: SelectionStore,
    annotator: VisualAnnotator,
}

impl SelectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Complete construction: `Initializing -> Ready`, crosshair off.
    /// Nothing is emitted since no origin can be trusted yet.
    pub fn bootstrap(&mut self, cx: &mut SelectionContext<'_>) {
        self.annotator.set_selection_mode_cursor(cx.document, false);
        if cx.session.state == SessionState::Initializing {
            cx.transition(SessionState::Ready);
        }
    }

    pub fn enter_selection_mode(&mut self, cx: &mut SelectionContext<'_>) {
        self.reset(cx.document);
        cx.transition(SessionState::Selecting);
        self.annotator.set_selection_mode_cursor(cx.document, true);
        cx.emit_state();
    }

    pub fn enter_ready_mode(&mut self, cx: &mut SelectionContext<'_>) {
        self.reset(cx.document);
        cx.transition(SessionState::Ready);
        self.annotator.set_selection_mode_cursor(cx.document, false);
        self.annotator.clear_hover(cx.document);
        cx.emit_state();
    }

    /// Drop every selection in the current mode
    pub fn clear_all(&mut self, cx: &mut SelectionContext<'_>) {
        cx.emit(OutboundMessage::status("clearing selections"));
        self.reset(cx.document);
    }

    /// Drop one selection; unknown ids only produce the status line
    pub fn remove_one(&mut self, cx: &mut SelectionContext<'_>, id: &ElementId) {
        cx.emit(OutboundMessage::status(format!("removing {}", id)));
        if let Some(entry) = self.store.remove(id) {
            self.annotator.unmark(cx.document, entry.element);
        }
    }

    /// Toggle the element under a click. Returns the clicked element's id,
    /// or `None` when not selecting or the target is gone.
    pub fn toggle_at_point(&mut self, cx: &mut SelectionContext<'_>, target: ElementRef) -> Option<ElementId> {
        if !cx.session.is_selecting() {
            return None;
        }
        let target = resolve_target(cx.document, target)?;

        let tree = canonicalize(cx.document, target);
        let id = identify(&tree);

        if let Some(entry) = self.store.remove(&id) {
            log::debug!("Deselected {}", id);
            self.annotator.unmark(cx.document, entry.element);
        } else {
            log::debug!("Selected {}", id);
            self.add_selection(cx.document, id.clone(), target, tree.clone());
        }

        let payload = ElementSelectionPayload {
            selected_elements: self.report(cx.document, true),
            selected_element_ids: self.store.ids().cloned().collect(),
            element_id: id.clone(),
            element_tree: tree,
        };
        cx.emit(OutboundMessage::ElementSelection(payload));
        Some(id)
    }

    /// Hover highlight follows the pointer while selecting
    pub fn pointer_over(&mut self, cx: &mut SelectionContext<'_>, target: ElementRef) {
        if !cx.session.is_selecting() {
            return;
        }
        let Some(target) = resolve_target(cx.document, target) else {
            return;
        };
        self.annotator.clear_hover(cx.document);
        self.annotator.mark_hover(cx.document, target);
    }

    pub fn pointer_out(&mut self, cx: &mut SelectionContext<'_>, target: ElementRef) {
        if !cx.session.is_selecting() {
            return;
        }
        if let Some(target) = resolve_target(cx.document, target) {
            self.annotator.unmark_hover(cx.document, target);
        }
    }

    /// Reselect every element whose current identity is in `ids`.
    ///
    /// Identities are recomputed for the whole document before any
    /// annotation is applied. When several elements share an id, the first
    /// in document order wins. Returns the matched ids, a subset of `ids`.
    pub fn rebuild_selection(&mut self, cx: &mut SelectionContext<'_>, ids: &[ElementId]) -> Vec<ElementId> {
        self.reset(cx.document);

        let wanted: HashSet<&ElementId> = ids.iter().collect();
        let mut matched: Vec<(ElementId, ElementRef, String)> = Vec::new();
        if !wanted.is_empty() {
            for el in cx.document.elements() {
                if is_protocol_artifact(cx.document, el) {
                    continue;
                }
                let tree = canonicalize(cx.document, el);
                let id = identify(&tree);
                if wanted.contains(&id) {
                    matched.push((id, el, tree));
                }
            }
        }

        let mut seen = HashSet::new();
        let matched_ids: Vec<ElementId> = matched
            .iter()
            .filter(|(id, _, _)| seen.insert(id.clone()))
            .map(|(id, _, _)| id.clone())
            .collect();
        log::debug!("Rebuild matched {} of {} requested ids", matched_ids.len(), ids.len());

        // Later matches overwrite earlier ones sharing an id
        for (id, el, tree) in matched {
            self.add_selection(cx.document, id, el, tree);
        }

        if !self.store.is_empty() {
            cx.transition(SessionState::Selecting);
            self.annotator.set_selection_mode_cursor(cx.document, true);
            cx.emit_state();
        }

        let payload = SelectionRebuiltPayload {
            selected_elements: self.report(cx.document, false),
            selected_element_ids: self.store.ids().cloned().collect(),
        };
        cx.emit(OutboundMessage::SelectionRebuilt(payload));
        matched_ids
    }

    fn add_selection(&mut self, doc: &mut Document, id: ElementId, element: ElementRef, tree: String) {
        if let Some(previous) = self.store.add(id.clone(), element, tree) {
            if previous.element != element {
                self.annotator.unmark(doc, previous.element);
            }
        }
        self.annotator.mark_selected(doc, element, id.as_str());
    }

    /// Empty the store and sweep every annotation, tracked or stray
    fn reset(&mut self, doc: &mut Document) {
        for SelectionEntry { element, .. } in self.store.drain() {
            self.annotator.unmark(doc, element);
        }
        self.annotator.clear_all(doc);
    }

    fn report(&self, doc: &Document, with_tag: bool) -> Vec<SelectedElement> {
        self.store
            .values()
            .map(|entry| SelectedElement {
                id: entry.id.clone(),
                tag_name: with_tag.then(|| doc.tag_name(entry.element).unwrap_or_default().to_string()),
                dom_tree_string: entry.serialization.clone(),
            })
            .collect()
    }
}

/// Map an event target to the element the user means: badges resolve to
/// their owner. Stale targets resolve to nothing.
fn resolve_target(doc: &Document, target: ElementRef) -> Option<ElementRef> {
    if !doc.is_attached(target) || doc.tag_name(target).is_none() {
        return None;
    }
    if is_protocol_artifact(doc, target) {
        return doc.parent(target);
    }
    Some(target)
}
