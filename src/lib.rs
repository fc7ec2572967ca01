//! # dom-picker
//!
//! An element picker that lives inside a rendered document and is driven by a
//! parent frame over a cross-origin message channel.
//!
//! ## Features
//!
//! - **Structural identity**: every element gets a short id derived from its
//!   position and markup, so the same logical element can be found again after
//!   the document is rebuilt from scratch
//! - **Selection state machine**: enter/leave selection mode, click-to-toggle,
//!   clear, remove and rebuild operations
//! - **Protocol router**: origin allow-listing, acknowledgement of every
//!   accepted message, and delivery to the trusted origin only
//! - **Visual annotations**: outline classes and id badges that never leak into
//!   element identity
//!
//! ## Usage
//!
//! ```rust
//! use dom_picker::{Document, Editor, EditorOptions, ElementNode, RecordingTransport};
//! use serde_json::json;
//!
//! let page = ElementNode::new("body").with_children(vec![
//!     ElementNode::new("button").with_attribute("id", "play").with_text("Play"),
//! ]);
//! let mut editor = Editor::new(
//!     Document::from_node(&page),
//!     EditorOptions::default(),
//!     RecordingTransport::new(),
//! );
//!
//! editor.receive("http://localhost:3000", json!({ "type": "tool-element-selection" }));
//! let button = editor.document().find_by_id_attr("play").unwrap();
//! editor.click(button);
//!
//! assert_eq!(editor.selected_ids().len(), 1);
//! assert_eq!(editor.transport().kinds(), vec!["ack", "status", "element-selection"]);
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Arena document, markup rendering and canonical serialization
//! - [`identity`]: Content hash identifiers
//! - [`selection`]: Selection store, annotator and state machine
//! - [`protocol`]: Message types, router and transports
//! - [`editor`]: The embedded editor tying it all together
//! - [`config`]: Editor options and the origin allow-list
//! - [`error`]: Error types and result aliases

pub mod config;
pub mod dom;
pub mod editor;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod selection;
pub mod session;

pub use config::EditorOptions;
pub use dom::{Document, ElementNode, ElementRef, canonicalize};
pub use editor::{Editor, EditorEvent};
pub use error::{EditorError, Result};
pub use identity::{ElementId, identify, identify_element};
pub use protocol::{
    DefaultAction, InboundEnvelope, InboundMessage, JsonLinesTransport, OutboundMessage, RecordingTransport,
    Transport,
};
pub use selection::{SelectionEngine, SelectionStore, VisualAnnotator};
pub use session::{EditorSession, SessionState};
