//! Concept lifecycle hooks.

use std::sync::Arc;

use strand_cache::CacheProvider;
use strand_core::{
    attribute_index, Attribute, AttributeType, Casting, ConceptReader, Entity, EntityType,
    ImplicitType, Relation, RelationEdge, RelationType, Role, Rule, SchemaConcept, Thing, TxId,
    Type, Value,
};
use strand_dedup::AttributeDedup;
use strand_stats::StatisticsDelta;
use tracing::{debug, trace};

use crate::error::ObserverResult;

/// Propagates concept lifecycle events of one transaction.
///
/// The write path calls exactly one hook per concept change, in line with
/// the change. Each hook leaves every dependent cache consistent with that
/// change before it returns. The observer only writes; the one read it
/// performs is walking existing instances through a [`ConceptReader`].
pub struct ConceptObserver<'t> {
    tx: &'t TxId,
    caches: &'t mut CacheProvider,
    statistics: &'t mut StatisticsDelta,
    dedup: &'t dyn AttributeDedup,
}

impl<'t> ConceptObserver<'t> {
    pub fn new(
        tx: &'t TxId,
        caches: &'t mut CacheProvider,
        statistics: &'t mut StatisticsDelta,
        dedup: &'t dyn AttributeDedup,
    ) -> Self {
        Self {
            tx,
            caches,
            statistics,
            dedup,
        }
    }

    // ========== Deletion ==========

    /// A thing was deleted.
    ///
    /// Attributes additionally acknowledge the deletion of their index, after
    /// the generic path has completed.
    pub fn thing_deleted(&mut self, thing: &Thing) -> ObserverResult<()> {
        let ty = thing.ty();
        debug!(tx = %self.tx, concept = %thing.id(), label = %ty.label, "thing deleted");

        self.statistics.decrement(ty);
        self.caches.answer_cache().ack_deletion(ty)?;
        self.caches.transaction_cache_mut().remove(thing.clone());

        if let Thing::Attribute(attribute) = thing {
            self.attribute_deleted(attribute)?;
        }
        Ok(())
    }

    /// A relation edge was deleted.
    ///
    /// `wrapping` resolves the reified relation wrapping the edge, if any. It
    /// is only invoked for inferred edges.
    pub fn relation_edge_deleted(
        &mut self,
        edge: &RelationEdge,
        wrapping: impl FnOnce() -> Option<Thing>,
    ) -> ObserverResult<()> {
        debug!(
            tx = %self.tx,
            concept = %edge.id,
            label = %edge.ty.label,
            inferred = edge.inferred,
            "relation edge deleted"
        );

        self.statistics.decrement(&edge.ty);
        self.caches.answer_cache().ack_deletion(&edge.ty)?;

        if edge.inferred {
            if let Some(wrapper) = wrapping() {
                self.caches
                    .transaction_cache_mut()
                    .remove_inferred_instance(&wrapper);
            }
        }
        Ok(())
    }

    /// A type, role or rule was deleted.
    pub fn schema_concept_deleted(&mut self, concept: &SchemaConcept) -> ObserverResult<()> {
        debug!(tx = %self.tx, concept = %concept.id(), label = %concept.label(), "schema concept deleted");

        self.caches.rule_cache().clear()?;
        self.caches.transaction_cache_mut().remove(concept.clone());
        Ok(())
    }

    fn attribute_deleted(&mut self, attribute: &Attribute) -> ObserverResult<()> {
        let index = attribute_index(&attribute.ty.label, &attribute.value);
        trace!(tx = %self.tx, index = %index, "acknowledging attribute delete");
        self.dedup.ack_delete(&index, self.tx)?;
        Ok(())
    }

    // ========== Creation ==========

    fn thing_created(&mut self, thing: Thing, inferred: bool) -> ObserverResult<()> {
        let ty = Arc::clone(thing.ty());
        debug!(tx = %self.tx, concept = %thing.id(), label = %ty.label, inferred, "thing created");

        self.caches.rule_cache().ack_type_instance(&ty)?;
        self.statistics.increment(&ty);

        if inferred {
            self.caches
                .transaction_cache_mut()
                .add_inferred_instance(thing.clone());
        } else {
            // Inferred facts are produced by reasoning itself.
            self.caches.answer_cache().ack_insertion()?;
        }

        let key_indices = if ty.is_key_relation() {
            modified_key_indices(&ty, &thing)
        } else {
            Vec::new()
        };

        let cache = self.caches.transaction_cache_mut();
        cache.cache_concept(thing.clone());
        if ty.has_keys() {
            cache.track_for_validation(thing);
        }
        for index in key_indices {
            trace!(tx = %self.tx, index = %index, "key index modified");
            cache.add_modified_key_index(index);
        }
        Ok(())
    }

    /// An attribute was created holding `value`.
    ///
    /// The index is registered in the transaction cache before the thing is
    /// created and acknowledged to the dedup coordinator last. A dedup
    /// failure leaves the attribute registered.
    pub fn attribute_created(
        &mut self,
        attribute: &Attribute,
        value: &Value,
        inferred: bool,
    ) -> ObserverResult<()> {
        let label = attribute.ty.label.clone();
        let index = attribute_index(&label, value);

        self.caches
            .transaction_cache_mut()
            .add_new_attribute(label, index.clone(), attribute.id);
        self.thing_created(Thing::from(attribute.clone()), inferred)?;

        trace!(tx = %self.tx, index = %index, "acknowledging attribute insert");
        self.dedup.ack_insert(&index, self.tx)?;
        Ok(())
    }

    pub fn relation_created(&mut self, relation: &Relation, inferred: bool) -> ObserverResult<()> {
        self.caches
            .transaction_cache_mut()
            .add_new_relation(relation.clone());
        self.thing_created(Thing::from(relation.clone()), inferred)
    }

    pub fn entity_created(&mut self, entity: &Entity, inferred: bool) -> ObserverResult<()> {
        self.thing_created(Thing::from(entity.clone()), inferred)
    }

    /// An implicit `@has-*` ownership relation was created.
    pub fn has_attribute_relation_created(
        &mut self,
        relation: &Relation,
        inferred: bool,
    ) -> ObserverResult<()> {
        self.thing_created(Thing::from(relation.clone()), inferred)
    }

    pub fn rule_created(&mut self, rule: &Rule) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %rule.label, "rule created");
        self.caches
            .transaction_cache_mut()
            .track_for_validation(rule.clone());
        Ok(())
    }

    pub fn role_created(&mut self, role: &Role) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %role.label, "role created");
        self.caches
            .transaction_cache_mut()
            .track_for_validation(role.clone());
        Ok(())
    }

    pub fn relation_type_created(&mut self, relation_type: &RelationType) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %relation_type.label, "relation type created");
        self.caches
            .transaction_cache_mut()
            .track_for_validation(Arc::clone(relation_type.as_type()));
        Ok(())
    }

    // ========== Schema Mutation ==========

    pub fn label_added(&mut self, concept: &SchemaConcept) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %concept.label(), "label added");
        self.caches
            .transaction_cache_mut()
            .cache_concept(concept.clone());
        Ok(())
    }

    pub fn label_removed(&mut self, concept: &SchemaConcept) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %concept.label(), "label removed");
        self.caches.transaction_cache_mut().remove(concept.clone());
        Ok(())
    }

    /// Abstract types leave validation; concrete ones re-enter it.
    pub fn concept_set_abstract(&mut self, ty: &Arc<Type>, is_abstract: bool) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %ty.label, is_abstract, "abstract flag set");
        let cache = self.caches.transaction_cache_mut();
        if is_abstract {
            cache.remove_from_validation(Arc::clone(ty));
        } else {
            cache.track_for_validation(Arc::clone(ty));
        }
        Ok(())
    }

    // ========== Role Players ==========

    /// Track every casting of every reified instance of `relation_type`.
    pub fn track_relation_instances_role_players(
        &mut self,
        relation_type: &RelationType,
        reader: &dyn ConceptReader,
    ) -> ObserverResult<()> {
        let mut tracked = 0usize;
        for instance in reader.instances(relation_type)? {
            let Thing::Relation(relation) = instance else {
                continue;
            };
            if !relation.reified {
                continue;
            }
            for casting in reader.relation_castings(&relation)? {
                self.caches
                    .transaction_cache_mut()
                    .track_for_validation(casting);
                tracked += 1;
            }
        }
        debug!(tx = %self.tx, label = %relation_type.label, tracked, "tracked relation role players");
        Ok(())
    }

    /// Track every casting played by an instance of `entity_type`.
    pub fn track_entity_instances_roles_played(
        &mut self,
        entity_type: &EntityType,
        reader: &dyn ConceptReader,
    ) -> ObserverResult<()> {
        self.track_instances_roles_played(entity_type, reader)
    }

    /// Track every casting played by an instance of `attribute_type`.
    pub fn track_attribute_instances_roles_played(
        &mut self,
        attribute_type: &AttributeType,
        reader: &dyn ConceptReader,
    ) -> ObserverResult<()> {
        self.track_instances_roles_played(attribute_type, reader)
    }

    fn track_instances_roles_played(
        &mut self,
        ty: &Type,
        reader: &dyn ConceptReader,
    ) -> ObserverResult<()> {
        let mut tracked = 0usize;
        for instance in reader.instances(ty)? {
            for casting in reader.castings_played(&instance)? {
                self.caches
                    .transaction_cache_mut()
                    .track_for_validation(casting);
                tracked += 1;
            }
        }
        debug!(tx = %self.tx, label = %ty.label, tracked, "tracked roles played");
        Ok(())
    }

    pub fn casting_deleted(&mut self, casting: &Casting) -> ObserverResult<()> {
        trace!(tx = %self.tx, casting = %casting, "casting deleted");
        self.caches.transaction_cache_mut().delete_casting(casting);
        Ok(())
    }

    /// The relation owning a relation edge is going away.
    pub fn delete_reified_owner(&mut self, owner: &Relation) -> ObserverResult<()> {
        trace!(tx = %self.tx, concept = %owner.id, "reified owner deleted");
        let cache = self.caches.transaction_cache_mut();
        cache.remove_new_relation(owner);
        if owner.inferred {
            cache.remove_inferred_instance(&Thing::from(owner.clone()));
        }
        Ok(())
    }

    /// `role` no longer belongs to `relation_type`; `castings` are those that
    /// played it.
    pub fn relation_role_unrelated(
        &mut self,
        relation_type: &RelationType,
        role: &Role,
        castings: &[Casting],
    ) -> ObserverResult<()> {
        trace!(
            tx = %self.tx,
            label = %relation_type.label,
            role = %role.label,
            castings = castings.len(),
            "role unrelated"
        );
        let cache = self.caches.transaction_cache_mut();
        cache.track_for_validation(Arc::clone(relation_type.as_type()));
        cache.track_for_validation(role.clone());
        for casting in castings {
            cache.track_for_validation(casting.clone());
        }
        Ok(())
    }

    pub fn role_deleted(&mut self, role: &Role) -> ObserverResult<()> {
        trace!(tx = %self.tx, label = %role.label, "role deleted");
        self.caches
            .transaction_cache_mut()
            .track_for_validation(role.clone());
        Ok(())
    }

    pub fn role_player_created(&mut self, casting: &Casting) -> ObserverResult<()> {
        trace!(tx = %self.tx, casting = %casting, "role player created");
        self.caches
            .transaction_cache_mut()
            .track_for_validation(casting.clone());
        Ok(())
    }
}

/// Indexes of the attribute role players of a `@key-*` relation, keyed by
/// the attribute type the key is declared on.
fn modified_key_indices(ty: &Type, thing: &Thing) -> Vec<String> {
    let (Some(label), Some(relation)) = (ImplicitType::explicit_label(&ty.label), thing.as_relation())
    else {
        return Vec::new();
    };
    relation
        .role_players()
        .filter_map(Thing::as_attribute)
        .map(|key| attribute_index(&label, &key.value))
        .collect()
}
