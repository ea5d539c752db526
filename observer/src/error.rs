//! Observer error types.

use strand_cache::CacheError;
use strand_core::GraphError;
use strand_dedup::DedupError;
use thiserror::Error;

/// Errors surfaced by lifecycle hooks.
///
/// Every variant wraps a collaborator failure unchanged.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Reading the instance graph failed.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// A shared cache rejected an update.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    /// The attribute dedup coordinator rejected an acknowledgement.
    #[error("dedup error: {0}")]
    Dedup(#[from] DedupError),
}

/// Result type for lifecycle hooks.
pub type ObserverResult<T> = Result<T, ObserverError>;
