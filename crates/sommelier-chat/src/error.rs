//! Error types for the conversation session.

use sommelier_core::error::ValidationError;

use crate::state::SessionState;

/// Errors from the session controller.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("no taste profile has been submitted")]
    NoProfile,
    #[error("a request is already in flight")]
    Busy,
    #[error("no request is in flight")]
    NotSending,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
    #[error("invalid taste profile: {0}")]
    Profile(#[from] ValidationError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Failures talking to the recommendation service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("service returned status {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("request timed out after {0} seconds")]
    Timeout(u64),
    #[error("invalid response body: {0}")]
    InvalidBody(String),
}

impl TransportError {
    /// Text to show the user for this failure.
    ///
    /// A non-success status carrying a service `detail` shows that detail;
    /// everything else shows `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            TransportError::Status {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}
