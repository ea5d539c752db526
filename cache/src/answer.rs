//! Reasoner answer cache.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use strand_core::{ConceptId, Label, Type};
use tracing::trace;

use crate::error::CacheResult;

/// Cache of reasoner query answers.
///
/// Shared by every transaction of a keyspace; implementations synchronise
/// internally.
pub trait AnswerCache: Send + Sync {
    /// A new asserted fact exists.
    fn ack_insertion(&self) -> CacheResult<()>;

    /// A fact of type `ty` vanished.
    fn ack_deletion(&self, ty: &Type) -> CacheResult<()>;
}

/// Answers cached for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswers {
    /// Types the query ranges over.
    pub types: HashSet<Label>,
    pub answers: Vec<ConceptId>,
    /// Whether the answers are known to be exhaustive.
    pub complete: bool,
}

/// In-memory [`AnswerCache`].
#[derive(Debug, Default)]
pub struct ReasonerAnswerCache {
    entries: RwLock<HashMap<String, CachedAnswers>>,
}

impl ReasonerAnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the complete answer set of a query.
    pub fn record(
        &self,
        query: impl Into<String>,
        types: impl IntoIterator<Item = Label>,
        answers: Vec<ConceptId>,
    ) {
        self.entries.write().insert(
            query.into(),
            CachedAnswers {
                types: types.into_iter().collect(),
                answers,
                complete: true,
            },
        );
    }

    pub fn get(&self, query: &str) -> Option<CachedAnswers> {
        self.entries.read().get(query).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl AnswerCache for ReasonerAnswerCache {
    fn ack_insertion(&self) -> CacheResult<()> {
        for entry in self.entries.write().values_mut() {
            entry.complete = false;
        }
        Ok(())
    }

    fn ack_deletion(&self, ty: &Type) -> CacheResult<()> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.types.contains(&ty.label));
        trace!(label = %ty.label, evicted = before - entries.len(), "answer cache deletion");
        Ok(())
    }
}
