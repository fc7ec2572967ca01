use thiserror::Error;

/// Errors raised while loading documents or parsing protocol input.
///
/// Protocol and event handlers never surface these: a handler that cannot
/// make sense of its input logs and degrades to a no-op so the channel stays
/// available for the next message.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
