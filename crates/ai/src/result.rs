use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text returned by the explanation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    /// One short sentence, already trimmed.
    pub text: String,

    /// Model that produced the text (empty for non-model explainers).
    pub model: String,

    /// Number of calls made, including the successful one.
    pub attempts: u32,
}

impl Explanation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: String::new(),
            attempts: 1,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("explanation service is not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl AiError {
    /// Timeouts, connection failures, throttling and 5xx are worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Transport(_) => true,
            AiError::Upstream { status, .. } => *status == 429 || *status >= 500,
            AiError::NotConfigured | AiError::MalformedResponse(_) => false,
        }
    }
}
