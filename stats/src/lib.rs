//! Strand Statistics
//!
//! Instance counts per type.
//!
//! Responsibilities:
//! - Accumulate a transaction's signed per-type deltas
//! - Merge committed deltas into keyspace-wide totals

mod delta;
mod keyspace;

pub use delta::StatisticsDelta;
pub use keyspace::KeyspaceStatistics;
