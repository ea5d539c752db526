//! Keyspace-wide instance counts.

use std::collections::HashMap;

use parking_lot::RwLock;
use strand_core::Label;
use tracing::debug;

use crate::StatisticsDelta;

/// Committed instance counts shared by every transaction of a keyspace.
#[derive(Debug, Default)]
pub struct KeyspaceStatistics {
    counts: RwLock<HashMap<Label, i64>>,
}

impl KeyspaceStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed instance count of a type.
    pub fn count(&self, label: &Label) -> i64 {
        self.counts.read().get(label).copied().unwrap_or(0)
    }

    /// Merge a committed transaction's delta into the totals.
    pub fn commit(&self, delta: &StatisticsDelta) {
        let mut counts = self.counts.write();
        for (label, change) in delta.iter().filter(|(_, change)| *change != 0) {
            *counts.entry(label.clone()).or_insert(0) += change;
        }
        debug!(types = counts.len(), "merged statistics delta");
    }
}
