use crate::config::EditorOptions;
use crate::dom::{Document, ElementRef};
use crate::protocol::message::{InboundEnvelope, InboundMessage, OutboundMessage};
use crate::protocol::transport::Transport;
use crate::selection::{SelectionContext, SelectionEngine};
use crate::session::EditorSession;

/// What the host should do with the default action of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultAction {
    Allow,
    Prevent,
}

/// Document-level pointer observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Click { target: ElementRef },
    Over { target: ElementRef },
    Out { target: ElementRef },
}

/// Message boundary between the parent frame and the selection engine.
///
/// Checks origins, acknowledges accepted messages before acting on them and
/// forwards every outbound message to the trusted origin only.
#[derive(Debug)]
pub struct ProtocolRouter<T: Transport> {
    options: EditorOptions,
    transport: T,
}

impl<T: Transport> ProtocolRouter<T> {
    pub fn new(options: EditorOptions, transport: T) -> Self {
        Self { options, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Post to the trusted origin, or drop when there is none
    pub fn send(&mut self, session: &EditorSession, message: &OutboundMessage) {
        match session.trusted_origin.as_deref() {
            Some(origin) => self.transport.post_message(message, origin),
            None => log::debug!("No trusted origin yet, dropping {} message", message.kind()),
        }
    }

    /// Process one inbound delivery to completion
    pub fn handle_inbound(
        &mut self,
        session: &mut EditorSession,
        document: &mut Document,
        engine: &mut SelectionEngine,
        envelope: InboundEnvelope,
    ) {
        if !self.options.is_allowed(&envelope.origin) {
            log::warn!("Rejected message from disallowed origin {}", envelope.origin);
            let error = OutboundMessage::error(format!("disallowed origin: {}", envelope.origin));
            self.send(session, &error);
            return;
        }

        session.trusted_origin = Some(envelope.origin);
        let parsed = InboundMessage::parse(&envelope.data);
        self.send(session, &OutboundMessage::ack(envelope.data));

        let message = match parsed {
            Ok(message) => message,
            Err(e) => {
                log::debug!("Ignoring inbound message: {}", e);
                return;
            }
        };
        log::debug!("Dispatching {}", message.kind());

        let mut outbox = Vec::new();
        {
            let mut cx = SelectionContext::new(session, document, &mut outbox);
            match message {
                InboundMessage::Ready => engine.enter_ready_mode(&mut cx),
                InboundMessage::ToolElementSelection => engine.enter_selection_mode(&mut cx),
                InboundMessage::ClearSelection => engine.clear_all(&mut cx),
                InboundMessage::RemoveSelection { element } => engine.remove_one(&mut cx, &element),
                InboundMessage::RebuildSelection { ids } => {
                    engine.rebuild_selection(&mut cx, &ids);
                }
            }
        }
        self.flush(session, outbox);
    }

    /// Route a pointer observation; only acts while selecting
    pub fn handle_pointer(
        &mut self,
        session: &mut EditorSession,
        document: &mut Document,
        engine: &mut SelectionEngine,
        event: PointerEvent,
    ) -> DefaultAction {
        if !session.is_selecting() {
            return DefaultAction::Allow;
        }

        let mut outbox = Vec::new();
        {
            let mut cx = SelectionContext::new(session, document, &mut outbox);
            match event {
                PointerEvent::Click { target } => {
                    engine.toggle_at_point(&mut cx, target);
                }
                PointerEvent::Over { target } => engine.pointer_over(&mut cx, target),
                PointerEvent::Out { target } => engine.pointer_out(&mut cx, target),
            }
        }
        self.flush(session, outbox);

        match event {
            PointerEvent::Click { .. } => DefaultAction::Prevent,
            _ => DefaultAction::Allow,
        }
    }

    fn flush(&mut self, session: &EditorSession, outbox: Vec<OutboundMessage>) {
        for message in &outbox {
            self.send(session, message);
        }
    }
}
