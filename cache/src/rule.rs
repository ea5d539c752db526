//! Rule applicability cache.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use strand_core::{Label, Type};
use tracing::debug;

use crate::error::CacheResult;

/// Cache of which rules are relevant to which types.
///
/// Shared by every transaction of a keyspace; implementations synchronise
/// internally.
pub trait RuleCache: Send + Sync {
    /// Hint that `ty` now has at least one instance.
    fn ack_type_instance(&self, ty: &Type) -> CacheResult<()>;

    /// Invalidate all applicability information.
    fn clear(&self) -> CacheResult<()>;
}

#[derive(Debug, Default)]
struct RuleCacheState {
    /// Memoised applicable rules per type.
    applicable: HashMap<Label, Vec<Label>>,
    /// Types known to have instances.
    instantiated: HashSet<Label>,
    /// Types known to have no instances.
    absent: HashSet<Label>,
}

/// In-memory [`RuleCache`].
#[derive(Debug, Default)]
pub struct RuleApplicabilityCache {
    state: RwLock<RuleCacheState>,
}

impl RuleApplicabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoise the rules applicable to a type.
    pub fn record_applicable(&self, ty: &Label, rules: Vec<Label>) {
        self.state.write().applicable.insert(ty.clone(), rules);
    }

    pub fn applicable_rules(&self, ty: &Label) -> Option<Vec<Label>> {
        self.state.read().applicable.get(ty).cloned()
    }

    /// Record that a type has no instances, unless one was acknowledged.
    pub fn mark_absent(&self, ty: &Label) {
        let mut state = self.state.write();
        if !state.instantiated.contains(ty) {
            state.absent.insert(ty.clone());
        }
    }

    pub fn is_absent(&self, ty: &Label) -> bool {
        self.state.read().absent.contains(ty)
    }

    pub fn has_instances(&self, ty: &Label) -> bool {
        self.state.read().instantiated.contains(ty)
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.applicable.is_empty() && state.instantiated.is_empty() && state.absent.is_empty()
    }
}

impl RuleCache for RuleApplicabilityCache {
    fn ack_type_instance(&self, ty: &Type) -> CacheResult<()> {
        let mut state = self.state.write();
        state.absent.remove(&ty.label);
        state.instantiated.insert(ty.label.clone());
        Ok(())
    }

    fn clear(&self) -> CacheResult<()> {
        let mut state = self.state.write();
        state.applicable.clear();
        state.instantiated.clear();
        state.absent.clear();
        debug!("cleared rule applicability cache");
        Ok(())
    }
}
