//! Attribute index acknowledgements across transactions.

use std::collections::HashSet;

use dashmap::DashMap;
use strand_core::TxId;
use tracing::{debug, trace, warn};

use crate::error::DedupResult;

/// Coordinator of in-flight attribute index acknowledgements.
///
/// Called concurrently by every open transaction; implementations must be
/// safe to share across threads.
pub trait AttributeDedup: Send + Sync {
    /// `tx` holds a candidate attribute for `index`.
    fn ack_insert(&self, index: &str, tx: &TxId) -> DedupResult<()>;

    /// `tx` removed an attribute with `index`.
    fn ack_delete(&self, index: &str, tx: &TxId) -> DedupResult<()>;

    /// Drop every acknowledgement held by `tx`. Called when it rolls back.
    fn release_all(&self, tx: &TxId) -> DedupResult<()>;
}

/// Acknowledgements recorded against one index.
#[derive(Debug, Default)]
struct IndexAcks {
    inserted: HashSet<TxId>,
    deleted: HashSet<TxId>,
}

impl IndexAcks {
    fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty()
    }
}

/// In-memory [`AttributeDedup`] shared by all transactions of a process.
#[derive(Debug, Default)]
pub struct AttributeManager {
    /// Index -> acknowledging transactions.
    acks: DashMap<String, IndexAcks>,
    /// Transaction -> indexes it acknowledged.
    by_tx: DashMap<TxId, HashSet<String>>,
}

impl AttributeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager pre-sized for `capacity` distinct indexes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            acks: DashMap::with_capacity(capacity),
            by_tx: DashMap::new(),
        }
    }

    /// Whether `tx` inserted an index some other open transaction also
    /// inserted, so its commit must go through reconciliation.
    pub fn requires_lock(&self, tx: &TxId) -> bool {
        let Some(indices) = self.by_tx.get(tx).map(|set| set.value().clone()) else {
            return false;
        };
        indices.iter().any(|index| {
            self.acks
                .get(index)
                .is_some_and(|acks| acks.inserted.contains(tx) && acks.inserted.len() > 1)
        })
    }

    /// Release `tx` after it committed.
    pub fn ack_commit(&self, tx: &TxId) -> DedupResult<()> {
        let released = self.release(tx);
        debug!(%tx, released, "released attribute acks on commit");
        Ok(())
    }

    /// Transactions holding a candidate attribute for `index`, sorted.
    pub fn candidates(&self, index: &str) -> Vec<TxId> {
        self.sorted(index, |acks| &acks.inserted)
    }

    /// Transactions that deleted an attribute with `index`, sorted.
    pub fn deletions(&self, index: &str) -> Vec<TxId> {
        self.sorted(index, |acks| &acks.deleted)
    }

    pub fn is_tracking(&self, index: &str) -> bool {
        self.acks.contains_key(index)
    }

    /// Indexes acknowledged by `tx`, sorted.
    pub fn pending_indices(&self, tx: &TxId) -> Vec<String> {
        let mut indices: Vec<_> = self
            .by_tx
            .get(tx)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        indices.sort();
        indices
    }

    fn sorted(&self, index: &str, select: impl Fn(&IndexAcks) -> &HashSet<TxId>) -> Vec<TxId> {
        let mut txs: Vec<_> = self
            .acks
            .get(index)
            .map(|acks| select(acks.value()).iter().cloned().collect())
            .unwrap_or_default();
        txs.sort();
        txs
    }

    fn track(&self, index: &str, tx: &TxId) {
        self.by_tx
            .entry(tx.clone())
            .or_default()
            .insert(index.to_string());
    }

    /// Remove `tx` from every index it acknowledged; returns how many.
    fn release(&self, tx: &TxId) -> usize {
        let Some((_, indices)) = self.by_tx.remove(tx) else {
            return 0;
        };
        for index in &indices {
            let emptied = match self.acks.get_mut(index) {
                Some(mut acks) => {
                    acks.inserted.remove(tx);
                    acks.deleted.remove(tx);
                    acks.is_empty()
                }
                None => false,
            };
            if emptied {
                self.acks.remove_if(index, |_, acks| acks.is_empty());
            }
        }
        indices.len()
    }
}

impl AttributeDedup for AttributeManager {
    fn ack_insert(&self, index: &str, tx: &TxId) -> DedupResult<()> {
        let contenders = {
            let mut acks = self.acks.entry(index.to_string()).or_default();
            acks.inserted.insert(tx.clone());
            acks.inserted.len()
        };
        self.track(index, tx);

        if contenders > 1 {
            warn!(%tx, index, contenders, "concurrent attribute insert");
        } else {
            trace!(%tx, index, "attribute insert acknowledged");
        }
        Ok(())
    }

    fn ack_delete(&self, index: &str, tx: &TxId) -> DedupResult<()> {
        self.acks
            .entry(index.to_string())
            .or_default()
            .deleted
            .insert(tx.clone());
        self.track(index, tx);

        trace!(%tx, index, "attribute delete acknowledged");
        Ok(())
    }

    fn release_all(&self, tx: &TxId) -> DedupResult<()> {
        let released = self.release(tx);
        debug!(%tx, released, "released attribute acks on rollback");
        Ok(())
    }
}
