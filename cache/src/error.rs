//! Cache error types.

use thiserror::Error;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors that can occur while updating a shared cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache corrupted: {message}")]
    Corrupted { message: String },

    #[error("Cache unavailable: {message}")]
    Unavailable { message: String },
}

impl CacheError {
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
