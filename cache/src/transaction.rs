//! Transaction cache for tracking uncommitted concept changes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use strand_core::{
    attribute_index, Casting, Concept, ConceptId, Label, Relation, Role, Rule, SchemaConcept, Thing,
    Type,
};

/// Something that must be re-validated before the transaction commits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValidationTarget {
    Thing(Thing),
    Schema(SchemaConcept),
    Casting(Casting),
}

impl From<Thing> for ValidationTarget {
    fn from(thing: Thing) -> Self {
        ValidationTarget::Thing(thing)
    }
}

impl From<SchemaConcept> for ValidationTarget {
    fn from(concept: SchemaConcept) -> Self {
        ValidationTarget::Schema(concept)
    }
}

impl From<Arc<Type>> for ValidationTarget {
    fn from(ty: Arc<Type>) -> Self {
        ValidationTarget::Schema(SchemaConcept::Type(ty))
    }
}

impl From<Role> for ValidationTarget {
    fn from(role: Role) -> Self {
        ValidationTarget::Schema(SchemaConcept::Role(role))
    }
}

impl From<Rule> for ValidationTarget {
    fn from(rule: Rule) -> Self {
        ValidationTarget::Schema(SchemaConcept::Rule(rule))
    }
}

impl From<Casting> for ValidationTarget {
    fn from(casting: Casting) -> Self {
        ValidationTarget::Casting(casting)
    }
}

/// Per-transaction record of uncommitted concept changes.
///
/// This is the transaction's single source of truth until commit. It is
/// discarded wholesale on rollback.
#[derive(Debug, Clone, Default)]
pub struct TransactionCache {
    /// Concepts created or touched in this transaction, by id.
    concept_cache: HashMap<ConceptId, Concept>,
    /// Schema concepts by label.
    schema_concept_cache: HashMap<Label, SchemaConcept>,
    /// Concepts and castings pending pre-commit validation.
    validation: HashSet<ValidationTarget>,
    /// Attributes created in this transaction: (type label, index) -> id.
    new_attributes: HashMap<(Label, String), ConceptId>,
    /// Indexes of attributes deleted in this transaction.
    removed_attributes: HashSet<String>,
    /// Relations created in this transaction.
    new_relations: HashMap<ConceptId, Relation>,
    /// Things produced by reasoning.
    inferred_instances: HashSet<Thing>,
    /// Attribute indexes whose key ownership changed.
    modified_key_indices: HashSet<String>,
}

impl TransactionCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Concept Cache ==========

    /// Cache a concept by id, and by label if it is a schema concept.
    pub fn cache_concept(&mut self, concept: impl Into<Concept>) {
        let concept = concept.into();
        if let Concept::Schema(schema_concept) = &concept {
            self.schema_concept_cache
                .insert(schema_concept.label().clone(), schema_concept.clone());
        }
        self.concept_cache.insert(concept.id(), concept);
    }

    /// Remove every trace of a concept from this cache.
    pub fn remove(&mut self, concept: impl Into<Concept>) {
        let concept = concept.into();
        self.concept_cache.remove(&concept.id());

        match concept {
            Concept::Schema(schema_concept) => {
                if self
                    .schema_concept_cache
                    .get(schema_concept.label())
                    .is_some_and(|cached| cached.id() == schema_concept.id())
                {
                    self.schema_concept_cache.remove(schema_concept.label());
                }
                self.validation.remove(&ValidationTarget::Schema(schema_concept));
            }
            Concept::Thing(thing) => {
                self.inferred_instances.remove(&thing);
                match &thing {
                    Thing::Relation(relation) => {
                        self.new_relations.remove(&relation.id);
                    }
                    Thing::Attribute(attribute) => {
                        let index = attribute_index(&attribute.ty.label, &attribute.value);
                        self.new_attributes
                            .remove(&(attribute.ty.label.clone(), index.clone()));
                        self.removed_attributes.insert(index);
                    }
                    Thing::Entity(_) => {}
                }
                self.validation.remove(&ValidationTarget::Thing(thing));
            }
        }
    }

    pub fn get_cached_concept(&self, id: ConceptId) -> Option<&Concept> {
        self.concept_cache.get(&id)
    }

    pub fn get_cached_schema_concept(&self, label: &Label) -> Option<&SchemaConcept> {
        self.schema_concept_cache.get(label)
    }

    pub fn is_concept_cached(&self, id: ConceptId) -> bool {
        self.concept_cache.contains_key(&id)
    }

    // ========== Validation ==========

    pub fn track_for_validation(&mut self, target: impl Into<ValidationTarget>) {
        self.validation.insert(target.into());
    }

    pub fn remove_from_validation(&mut self, target: impl Into<ValidationTarget>) -> bool {
        self.validation.remove(&target.into())
    }

    pub fn is_tracked_for_validation(&self, target: impl Into<ValidationTarget>) -> bool {
        self.validation.contains(&target.into())
    }

    pub fn validation_targets(&self) -> impl Iterator<Item = &ValidationTarget> {
        self.validation.iter()
    }

    /// Things pending validation.
    pub fn modified_things(&self) -> impl Iterator<Item = &Thing> {
        self.validation.iter().filter_map(|target| match target {
            ValidationTarget::Thing(thing) => Some(thing),
            _ => None,
        })
    }

    /// Castings pending validation.
    pub fn modified_castings(&self) -> impl Iterator<Item = &Casting> {
        self.validation.iter().filter_map(|target| match target {
            ValidationTarget::Casting(casting) => Some(casting),
            _ => None,
        })
    }

    /// Drop a deleted casting from validation.
    pub fn delete_casting(&mut self, casting: &Casting) {
        self.validation
            .remove(&ValidationTarget::Casting(casting.clone()));
    }

    // ========== New Attributes / Relations ==========

    pub fn add_new_attribute(&mut self, label: Label, index: String, id: ConceptId) {
        self.removed_attributes.remove(&index);
        self.new_attributes.insert((label, index), id);
    }

    pub fn new_attributes(&self) -> &HashMap<(Label, String), ConceptId> {
        &self.new_attributes
    }

    pub fn removed_attributes(&self) -> &HashSet<String> {
        &self.removed_attributes
    }

    pub fn add_new_relation(&mut self, relation: Relation) {
        self.new_relations.insert(relation.id, relation);
    }

    pub fn remove_new_relation(&mut self, relation: &Relation) -> bool {
        self.new_relations.remove(&relation.id).is_some()
    }

    pub fn new_relations(&self) -> impl Iterator<Item = &Relation> {
        self.new_relations.values()
    }

    // ========== Inferred Instances ==========

    pub fn add_inferred_instance(&mut self, thing: Thing) {
        self.inferred_instances.insert(thing);
    }

    pub fn remove_inferred_instance(&mut self, thing: &Thing) -> bool {
        self.inferred_instances.remove(thing)
    }

    pub fn is_inferred_instance(&self, thing: &Thing) -> bool {
        self.inferred_instances.contains(thing)
    }

    pub fn inferred_instances(&self) -> impl Iterator<Item = &Thing> {
        self.inferred_instances.iter()
    }

    // ========== Key Indices ==========

    pub fn add_modified_key_index(&mut self, index: String) {
        self.modified_key_indices.insert(index);
    }

    pub fn modified_key_indices(&self) -> &HashSet<String> {
        &self.modified_key_indices
    }

    // ========== Lifecycle ==========

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.concept_cache.is_empty()
            && self.schema_concept_cache.is_empty()
            && self.validation.is_empty()
            && self.new_attributes.is_empty()
            && self.removed_attributes.is_empty()
            && self.new_relations.is_empty()
            && self.inferred_instances.is_empty()
            && self.modified_key_indices.is_empty()
    }

    /// Clear the cache (for rollback).
    pub fn clear(&mut self) {
        self.concept_cache.clear();
        self.schema_concept_cache.clear();
        self.validation.clear();
        self.new_attributes.clear();
        self.removed_attributes.clear();
        self.new_relations.clear();
        self.inferred_instances.clear();
        self.modified_key_indices.clear();
    }
}
