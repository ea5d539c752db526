//! Per-transaction cache context.

use std::sync::Arc;

use crate::{AnswerCache, RuleCache, TransactionCache};

/// The caches one transaction writes to.
///
/// Built once per transaction: the transaction cache is owned, the rule and
/// answer caches are shared with every other transaction of the keyspace.
pub struct CacheProvider {
    transaction_cache: TransactionCache,
    rule_cache: Arc<dyn RuleCache>,
    answer_cache: Arc<dyn AnswerCache>,
}

impl CacheProvider {
    pub fn new(rule_cache: Arc<dyn RuleCache>, answer_cache: Arc<dyn AnswerCache>) -> Self {
        Self {
            transaction_cache: TransactionCache::new(),
            rule_cache,
            answer_cache,
        }
    }

    pub fn transaction_cache(&self) -> &TransactionCache {
        &self.transaction_cache
    }

    pub fn transaction_cache_mut(&mut self) -> &mut TransactionCache {
        &mut self.transaction_cache
    }

    pub fn rule_cache(&self) -> &dyn RuleCache {
        self.rule_cache.as_ref()
    }

    pub fn answer_cache(&self) -> &dyn AnswerCache {
        self.answer_cache.as_ref()
    }
}

impl std::fmt::Debug for CacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheProvider")
            .field("transaction_cache", &self.transaction_cache)
            .finish_non_exhaustive()
    }
}
