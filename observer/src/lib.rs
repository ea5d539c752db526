//! Strand Observer
//!
//! The write-path consistency coordinator: one hook per concept lifecycle
//! event, fanning each event out to the caches, counters and coordinators
//! that depend on it.
//!
//! Responsibilities:
//! - Keep the transaction cache in step with every concept change
//! - Count instance creations and deletions per type
//! - Invalidate rule and answer caches when the graph changes
//! - Acknowledge attribute indexes to the dedup coordinator
//! - Decide what must be re-validated before commit

mod context;
mod error;
mod observer;

pub use context::TransactionContext;
pub use error::{ObserverError, ObserverResult};
pub use observer::ConceptObserver;
