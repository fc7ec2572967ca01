use std::fmt;

/// Lifecycle state of the embedded editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Initializing,
    /// Idle, selection mode off
    Ready,
    /// Click-to-toggle selection with hover highlighting
    Selecting,
}

impl SessionState {
    /// Name reported in `status` messages
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Initializing => "initializing",
            SessionState::Ready => "ready",
            SessionState::Selecting => "element-selection",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-document protocol session: who may hear from us, and what mode we are in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    /// Origin of the last accepted inbound message; outbound traffic goes
    /// nowhere until this is set
    pub trusted_origin: Option<String>,
    pub state: SessionState,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selecting(&self) -> bool {
        self.state == SessionState::Selecting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_initializing_and_untrusted() {
        let session = EditorSession::new();
        assert_eq!(session.state, SessionState::Initializing);
        assert!(session.trusted_origin.is_none());
        assert!(!session.is_selecting());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(SessionState::Ready.to_string(), "ready");
        assert_eq!(SessionState::Selecting.as_str(), "element-selection");
        assert_eq!(SessionState::Initializing.as_str(), "initializing");
    }
}
