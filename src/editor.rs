use crate::config::EditorOptions;
use crate::dom::{Document, ElementRef};
use crate::identity::{ElementId, identify_element};
use crate::protocol::message::InboundEnvelope;
use crate::protocol::router::{DefaultAction, PointerEvent, ProtocolRouter};
use crate::protocol::transport::Transport;
use crate::selection::{SelectionContext, SelectionEngine, SelectionStore};
use crate::session::{EditorSession, SessionState};
use serde_json::Value;
use std::collections::VecDeque;

/// Anything the editor reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A cross-document message delivery
    Message(InboundEnvelope),
    Click { target: ElementRef },
    PointerOver { target: ElementRef },
    PointerOut { target: ElementRef },
}

/// The element picker embedded in one document.
///
/// Owns the document, the protocol session and the selection engine. Events
/// are handled one at a time, each to completion, in arrival order.
#[derive(Debug)]
pub struct Editor<T: Transport> {
    document: Document,
    session: EditorSession,
    engine: SelectionEngine,
    router: ProtocolRouter<T>,
    pending: VecDeque<EditorEvent>,
}

impl<T: Transport> Editor<T> {
    /// Attach an editor to `document` and move it to `Ready`
    pub fn new(document: Document, options: EditorOptions, transport: T) -> Self {
        let mut editor = Self {
            document,
            session: EditorSession::new(),
            engine: SelectionEngine::new(),
            router: ProtocolRouter::new(options, transport),
            pending: VecDeque::new(),
        };

        let mut outbox = Vec::new();
        let mut cx = SelectionContext::new(&mut editor.session, &mut editor.document, &mut outbox);
        editor.engine.bootstrap(&mut cx);
        editor
    }

    /// Handle one event immediately
    pub fn dispatch(&mut self, event: EditorEvent) -> DefaultAction {
        match event {
            EditorEvent::Message(envelope) => {
                self.router
                    .handle_inbound(&mut self.session, &mut self.document, &mut self.engine, envelope);
                DefaultAction::Allow
            }
            EditorEvent::Click { target } => self.pointer(PointerEvent::Click { target }),
            EditorEvent::PointerOver { target } => self.pointer(PointerEvent::Over { target }),
            EditorEvent::PointerOut { target } => self.pointer(PointerEvent::Out { target }),
        }
    }

    fn pointer(&mut self, event: PointerEvent) -> DefaultAction {
        self.router
            .handle_pointer(&mut self.session, &mut self.document, &mut self.engine, event)
    }

    /// Queue an event for [`run_pending`](Self::run_pending)
    pub fn enqueue(&mut self, event: EditorEvent) {
        self.pending.push_back(event);
    }

    /// Drain the queue in FIFO order, returning how many events ran
    pub fn run_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.pending.pop_front() {
            self.dispatch(event);
            handled += 1;
        }
        handled
    }

    /// Deliver a raw message as if posted from `origin`
    pub fn receive(&mut self, origin: &str, data: Value) {
        self.dispatch(EditorEvent::Message(InboundEnvelope::new(origin, data)));
    }

    pub fn click(&mut self, target: ElementRef) -> DefaultAction {
        self.dispatch(EditorEvent::Click { target })
    }

    pub fn pointer_over(&mut self, target: ElementRef) {
        self.dispatch(EditorEvent::PointerOver { target });
    }

    pub fn pointer_out(&mut self, target: ElementRef) {
        self.dispatch(EditorEvent::PointerOut { target });
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for host-side DOM churn between events
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn selection(&self) -> &SelectionStore {
        self.engine.store()
    }

    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.engine.store().ids().cloned().collect()
    }

    /// Current identifier of an element, `None` for stale handles
    pub fn identify(&self, el: ElementRef) -> Option<ElementId> {
        identify_element(&self.document, el)
    }

    pub fn transport(&self) -> &T {
        self.router.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.router.transport_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::protocol::{OutboundMessage, RecordingTransport};
    use serde_json::json;

    const PARENT: &str = "http://localhost:3000";

    fn editor() -> Editor<RecordingTransport> {
        let doc = Document::from_node(&ElementNode::new("body").with_children(vec![
            ElementNode::new("h1").with_text("Title"),
            ElementNode::new("p").with_text("Body"),
        ]));
        Editor::new(doc, EditorOptions::default(), RecordingTransport::new())
    }

    #[test]
    fn test_construction_is_ready_and_silent() {
        let editor = editor();
        assert_eq!(editor.state(), SessionState::Ready);
        assert!(editor.transport().is_empty());
        assert!(editor.session().trusted_origin.is_none());
    }

    #[test]
    fn test_queue_runs_in_order() {
        let mut editor = editor();
        let h1 = editor.document().element_at(1).unwrap();

        editor.enqueue(EditorEvent::Message(InboundEnvelope::new(
            PARENT,
            json!({"type": "tool-element-selection"}),
        )));
        editor.enqueue(EditorEvent::Click { target: h1 });
        editor.enqueue(EditorEvent::Message(InboundEnvelope::new(PARENT, json!({"type": "clear-selection"}))));

        assert_eq!(editor.run_pending(), 3);
        assert_eq!(editor.run_pending(), 0);
        assert_eq!(
            editor.transport().kinds(),
            vec!["ack", "status", "element-selection", "ack", "status"]
        );
        assert!(editor.selected_ids().is_empty());
        assert_eq!(editor.state(), SessionState::Selecting);
    }

    #[test]
    fn test_click_outside_selection_mode_is_allowed() {
        let mut editor = editor();
        let p = editor.document().element_at(2).unwrap();
        assert_eq!(editor.click(p), DefaultAction::Allow);

        editor.receive(PARENT, json!({"type": "tool-element-selection"}));
        assert_eq!(editor.click(p), DefaultAction::Prevent);
        assert_eq!(editor.selected_ids(), vec![editor.identify(p).unwrap()]);

        editor.receive(PARENT, json!({"type": "ready"}));
        assert_eq!(editor.state(), SessionState::Ready);
        assert!(editor.selected_ids().is_empty());
        assert_eq!(
            editor.transport().messages().last(),
            Some(&OutboundMessage::status("ready"))
        );
    }
}
