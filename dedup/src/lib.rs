//! Strand Attribute Deduplication
//!
//! Process-wide bookkeeping of attribute index acknowledgements.
//!
//! Responsibilities:
//! - Record which transactions hold candidate attributes per index
//! - Detect when concurrent transactions created equal-index attributes
//! - Release a transaction's acknowledgements on commit or rollback

mod error;
mod manager;

pub use error::{DedupError, DedupResult};
pub use manager::{AttributeDedup, AttributeManager};
