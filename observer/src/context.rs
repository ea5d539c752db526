//! Per-transaction write context.

use std::sync::Arc;

use strand_cache::{CacheProvider, TransactionCache};
use strand_core::TxId;
use strand_dedup::AttributeDedup;
use strand_stats::StatisticsDelta;
use tracing::debug;

use crate::error::ObserverResult;
use crate::observer::ConceptObserver;

/// Everything one in-flight transaction writes to.
///
/// Owns the transaction's caches and statistics delta and shares the
/// process-wide dedup coordinator. Hooks are reached through
/// [`TransactionContext::observer`].
pub struct TransactionContext {
    tx: TxId,
    caches: CacheProvider,
    statistics: StatisticsDelta,
    dedup: Arc<dyn AttributeDedup>,
}

impl TransactionContext {
    pub fn new(tx: TxId, caches: CacheProvider, dedup: Arc<dyn AttributeDedup>) -> Self {
        debug!(%tx, "transaction context opened");
        Self {
            tx,
            caches,
            statistics: StatisticsDelta::new(),
            dedup,
        }
    }

    /// Borrow the lifecycle hooks of this transaction.
    pub fn observer(&mut self) -> ConceptObserver<'_> {
        ConceptObserver::new(
            &self.tx,
            &mut self.caches,
            &mut self.statistics,
            self.dedup.as_ref(),
        )
    }

    pub fn tx(&self) -> &TxId {
        &self.tx
    }

    pub fn caches(&self) -> &CacheProvider {
        &self.caches
    }

    pub fn transaction_cache(&self) -> &TransactionCache {
        self.caches.transaction_cache()
    }

    pub fn statistics(&self) -> &StatisticsDelta {
        &self.statistics
    }

    /// Hand the transaction's state to commit-time reconciliation.
    pub fn into_parts(self) -> (TxId, CacheProvider, StatisticsDelta) {
        (self.tx, self.caches, self.statistics)
    }

    /// Roll the transaction back.
    ///
    /// Drops the caches and statistics delta without running any hook and
    /// releases every attribute acknowledgement the transaction holds.
    pub fn discard(self) -> ObserverResult<()> {
        self.dedup.release_all(&self.tx)?;
        debug!(tx = %self.tx, "transaction context discarded");
        Ok(())
    }
}

impl std::fmt::Debug for TransactionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionContext")
            .field("tx", &self.tx)
            .field("caches", &self.caches)
            .field("statistics", &self.statistics)
            .finish_non_exhaustive()
    }
}
