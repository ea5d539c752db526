//! Strand Caches
//!
//! Transaction-scoped and process-wide caches kept in step with concept
//! lifecycle events.
//!
//! Responsibilities:
//! - Track a transaction's uncommitted concepts and validation work
//! - Track which rules apply to which types
//! - Keep cached reasoner answers sound under instance changes
//! - Hand all of the above to a transaction as one context value

mod answer;
mod error;
mod provider;
mod rule;
mod transaction;

pub use answer::{AnswerCache, CachedAnswers, ReasonerAnswerCache};
pub use error::{CacheError, CacheResult};
pub use provider::CacheProvider;
pub use rule::{RuleApplicabilityCache, RuleCache};
pub use transaction::{TransactionCache, ValidationTarget};
