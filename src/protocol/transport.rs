use crate::protocol::message::OutboundMessage;
use serde::Serialize;
use std::io::Write;

/// Delivery channel towards the parent frame.
///
/// Delivery is fire-and-forget: implementations must not fail the caller.
pub trait Transport {
    fn post_message(&mut self, message: &OutboundMessage, target_origin: &str);
}

/// A message as handed to the transport
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedMessage {
    pub target_origin: String,
    pub message: OutboundMessage,
}

/// Keeps every posted message in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    posted: Vec<PostedMessage>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posted(&self) -> &[PostedMessage] {
        &self.posted
    }

    pub fn messages(&self) -> impl Iterator<Item = &OutboundMessage> {
        self.posted.iter().map(|p| &p.message)
    }

    /// Message kinds in posting order
    pub fn kinds(&self) -> Vec<&'static str> {
        self.messages().map(OutboundMessage::kind).collect()
    }

    pub fn take(&mut self) -> Vec<PostedMessage> {
        std::mem::take(&mut self.posted)
    }

    pub fn len(&self) -> usize {
        self.posted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posted.is_empty()
    }
}

impl Transport for RecordingTransport {
    fn post_message(&mut self, message: &OutboundMessage, target_origin: &str) {
        self.posted.push(PostedMessage {
            target_origin: target_origin.to_string(),
            message: message.clone(),
        });
    }
}

/// Writes one `{"targetOrigin": .., "message": ..}` object per line
#[derive(Debug)]
pub struct JsonLinesTransport<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn post_message(&mut self, message: &OutboundMessage, target_origin: &str) {
        let line = PostedMessage {
            target_origin: target_origin.to_string(),
            message: message.clone(),
        };
        let result = serde_json::to_writer(&mut self.writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());
        if let Err(e) = result {
            log::warn!("Dropping outbound {} message: {}", message.kind(), e);
        }
    }
}
