//! Uncommitted per-type instance count deltas.

use std::collections::HashMap;

use strand_core::{Label, Type};

/// Signed instance-count deltas accumulated by one transaction.
///
/// Calls accumulate; nothing is deduplicated. The delta is only read when
/// the transaction commits.
#[derive(Debug, Clone, Default)]
pub struct StatisticsDelta {
    deltas: HashMap<Label, i64>,
}

impl StatisticsDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, ty: &Type) {
        *self.deltas.entry(ty.label.clone()).or_insert(0) += 1;
    }

    pub fn decrement(&mut self, ty: &Type) {
        *self.deltas.entry(ty.label.clone()).or_insert(0) -= 1;
    }

    /// Net delta of a type, zero if never touched.
    pub fn delta(&self, label: &Label) -> i64 {
        self.deltas.get(label).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, i64)> {
        self.deltas.iter().map(|(label, delta)| (label, *delta))
    }

    /// True if no type has a non-zero net delta.
    pub fn is_empty(&self) -> bool {
        self.deltas.values().all(|delta| *delta == 0)
    }

    pub fn clear(&mut self) {
        self.deltas.clear();
    }
}
