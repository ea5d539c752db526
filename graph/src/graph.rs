//! Core instance storage implementation.

use std::collections::HashMap;

use strand_core::{
    Casting, ConceptId, ConceptReader, GraphError, GraphResult, Label, Relation, Thing, Type,
};
use tracing::trace;

use crate::index::{CastingIndex, TypeIndex};

/// The in-memory instance graph.
#[derive(Debug)]
pub struct Graph {
    /// Thing storage
    things: HashMap<ConceptId, Thing>,
    /// Next concept id to allocate
    next_id: u64,
    /// Type index
    type_index: TypeIndex,
    /// Casting index
    castings: CastingIndex,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::with_starting_id(ConceptId::new(1))
    }

    /// Create a graph allocating ids from `first` onwards.
    pub fn with_starting_id(first: ConceptId) -> Self {
        Self {
            things: HashMap::new(),
            next_id: first.raw(),
            type_index: TypeIndex::new(),
            castings: CastingIndex::new(),
        }
    }

    /// Allocate a fresh concept id.
    pub fn alloc_id(&mut self) -> ConceptId {
        let id = ConceptId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // ==================== Thing Operations ====================

    /// Store a thing. Reified relations get a casting per role player.
    pub fn insert(&mut self, thing: impl Into<Thing>) -> ConceptId {
        let thing = thing.into();
        let id = thing.id();

        self.type_index.insert(&thing.ty().label, id);
        if let Thing::Relation(relation) = &thing {
            if relation.reified {
                for role_player in &relation.role_players {
                    self.castings.insert(Casting::new(
                        id,
                        relation.ty.label.clone(),
                        role_player.role.clone(),
                        role_player.player.id(),
                    ));
                }
            }
        }

        trace!(concept = %id, label = %thing.ty().label, "stored thing");
        self.things.insert(id, thing);
        id
    }

    /// Get a thing by ID.
    pub fn get(&self, id: ConceptId) -> Option<&Thing> {
        self.things.get(&id)
    }

    /// Delete a thing and every casting involving it.
    pub fn delete(&mut self, id: ConceptId) -> GraphResult<(Thing, Vec<Casting>)> {
        let thing = self.things.remove(&id).ok_or(GraphError::ConceptNotFound(id))?;
        self.type_index.remove(&thing.ty().label, id);
        let castings = self.castings.remove_involving(id);

        trace!(concept = %id, castings = castings.len(), "deleted thing");
        Ok((thing, castings))
    }

    /// Add a role player to a stored relation.
    pub fn add_role_player(
        &mut self,
        relation: ConceptId,
        role: impl Into<Label>,
        player: ConceptId,
    ) -> GraphResult<Casting> {
        let relation_type = match self.things.get(&relation) {
            Some(Thing::Relation(r)) => r.ty.label.clone(),
            Some(_) => {
                return Err(GraphError::invalid_operation(format!(
                    "{} is not a relation",
                    relation
                )))
            }
            None => return Err(GraphError::ConceptNotFound(relation)),
        };
        if !self.things.contains_key(&player) {
            return Err(GraphError::ConceptNotFound(player));
        }

        let casting = Casting::new(relation, relation_type, role, player);
        self.castings.insert(casting.clone());
        Ok(casting)
    }

    /// Remove a single casting.
    pub fn remove_casting(&mut self, casting: &Casting) -> GraphResult<()> {
        if self.castings.remove(casting) {
            Ok(())
        } else {
            Err(GraphError::invalid_operation(format!("no casting {}", casting)))
        }
    }

    /// Get the number of stored things.
    pub fn thing_count(&self) -> usize {
        self.things.len()
    }
}

impl ConceptReader for Graph {
    fn instances(&self, ty: &Type) -> GraphResult<Vec<Thing>> {
        self.type_index
            .get(&ty.label)
            .map(|id| self.things.get(&id).cloned().ok_or(GraphError::ConceptNotFound(id)))
            .collect()
    }

    fn relation_castings(&self, relation: &Relation) -> GraphResult<Vec<Casting>> {
        Ok(self.castings.of_relation(relation.id).to_vec())
    }

    fn castings_played(&self, thing: &Thing) -> GraphResult<Vec<Casting>> {
        Ok(self.castings.of_player(thing.id()).to_vec())
    }
}
