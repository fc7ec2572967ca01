//! Cross-frame message protocol
//!
//! - message: Inbound commands and outbound notifications
//! - router: Origin checks, acknowledgements and dispatch
//! - transport: Delivery towards the parent frame

pub mod message;
pub mod router;
pub mod transport;

pub use message::{
    ElementSelectionPayload, InboundEnvelope, InboundMessage, OutboundMessage, SelectedElement,
    SelectionRebuiltPayload,
};
pub use router::{DefaultAction, PointerEvent, ProtocolRouter};
pub use transport::{JsonLinesTransport, PostedMessage, RecordingTransport, Transport};
