//! Dedup error types.

use thiserror::Error;

/// Result type for dedup operations.
pub type DedupResult<T> = Result<T, DedupError>;

/// Errors raised by the attribute dedup coordinator.
#[derive(Debug, Error)]
pub enum DedupError {
    #[error("Attribute dedup coordinator unavailable: {message}")]
    Unavailable { message: String },
}

impl DedupError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
