/// Origins the editor accepts commands from unless configured otherwise
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "https://dev.caffeine.ai",
    "https://caffeine.ai",
];

/// Options for constructing an [`Editor`](crate::Editor)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// Exact origins (scheme, host and port) allowed to drive the editor
    pub allowed_origins: Vec<String>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl EditorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one origin to the allow-list
    pub fn allow_origin(mut self, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        if !self.allowed_origins.contains(&origin) {
            self.allowed_origins.push(origin);
        }
        self
    }

    /// Replace the allow-list
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == origin)
    }
}
