//! Indexes for efficient instance lookups.

use std::collections::{BTreeSet, HashMap};

use strand_core::{Casting, ConceptId, Label};

/// Type index: Label -> Set<ConceptId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<Label, BTreeSet<ConceptId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: &Label, id: ConceptId) {
        self.index.entry(label.clone()).or_default().insert(id);
    }

    pub fn remove(&mut self, label: &Label, id: ConceptId) {
        if let Some(set) = self.index.get_mut(label) {
            set.remove(&id);
            if set.is_empty() {
                self.index.remove(label);
            }
        }
    }

    /// Instances of a type in id order.
    pub fn get(&self, label: &Label) -> impl Iterator<Item = ConceptId> + '_ {
        self.index
            .get(label)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Casting index: castings by relation and by role player.
#[derive(Debug, Default)]
pub struct CastingIndex {
    by_relation: HashMap<ConceptId, Vec<Casting>>,
    by_player: HashMap<ConceptId, Vec<Casting>>,
}

impl CastingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, casting: Casting) {
        let by_relation = self.by_relation.entry(casting.relation).or_default();
        if by_relation.contains(&casting) {
            return;
        }
        by_relation.push(casting.clone());
        self.by_player.entry(casting.player).or_default().push(casting);
    }

    pub fn remove(&mut self, casting: &Casting) -> bool {
        let removed = Self::remove_from(&mut self.by_relation, casting.relation, casting);
        Self::remove_from(&mut self.by_player, casting.player, casting);
        removed
    }

    /// Remove every casting that involves the concept, as relation or player.
    pub fn remove_involving(&mut self, id: ConceptId) -> Vec<Casting> {
        let mut removed = self.by_relation.remove(&id).unwrap_or_default();
        removed.extend(self.by_player.remove(&id).unwrap_or_default());
        for casting in &removed {
            Self::remove_from(&mut self.by_relation, casting.relation, casting);
            Self::remove_from(&mut self.by_player, casting.player, casting);
        }
        removed
    }

    pub fn of_relation(&self, relation: ConceptId) -> &[Casting] {
        self.by_relation.get(&relation).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn of_player(&self, player: ConceptId) -> &[Casting] {
        self.by_player.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    fn remove_from(map: &mut HashMap<ConceptId, Vec<Casting>>, key: ConceptId, casting: &Casting) -> bool {
        let Some(list) = map.get_mut(&key) else {
            return false;
        };
        let before = list.len();
        list.retain(|c| c != casting);
        let removed = list.len() != before;
        if list.is_empty() {
            map.remove(&key);
        }
        removed
    }
}
