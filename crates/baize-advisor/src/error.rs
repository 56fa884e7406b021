use std::time::Duration;

/// Failures reported by an [`AdvisoryBackend`](crate::AdvisoryBackend).
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Backend is not configured or cannot be built
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The round trip to the remote service failed
    #[error("request failed: {0}")]
    Request(String),
}

/// Reasons a structured trivia reply is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("no JSON object in reply")]
    NoJson,

    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),

    #[error("expected 4 options, got {0}")]
    OptionCount(usize),

    #[error("option {0} is empty")]
    EmptyOption(usize),

    #[error("correctAnswer {0} is outside 0..=3")]
    AnswerOutOfRange(i64),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum AdvisoryError {
    /// Blank encyclopedia question; nothing was dispatched
    #[error("question is empty")]
    EmptyQuestion,

    #[error("transport failure: {0}")]
    Transport(#[from] BackendError),

    #[error("no reply within {0:?}")]
    Timeout(Duration),

    #[error("reply was empty")]
    EmptyBody,

    #[error("reply rejected: {0}")]
    Schema(#[from] SchemaError),
}

impl AdvisoryError {
    /// Transport and timeout failures mean nothing usable came back.
    pub fn is_transport(&self) -> bool {
        matches!(self, AdvisoryError::Transport(_) | AdvisoryError::Timeout(_))
    }
}
