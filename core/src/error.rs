//! Common error types for Strand.

use crate::{ConceptId, Label};
use thiserror::Error;

/// Errors raised while reading persisted concepts.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Concept not found.
    #[error("Concept not found: {0}")]
    ConceptNotFound(ConceptId),

    /// Type not found.
    #[error("Type not found: {0}")]
    TypeNotFound(Label),

    /// Invalid operation.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The backing store could not be reached.
    #[error("Graph storage unavailable: {0}")]
    Unavailable(String),
}

impl GraphError {
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
