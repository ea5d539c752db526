//! The Schema - immutable schema lookup.

use std::collections::HashMap;
use std::sync::Arc;

use strand_core::{
    AttributeType, ConceptId, EntityType, Label, RelationType, Role, Rule, SchemaConcept, Type,
};

/// The Schema provides lookup of schema concepts by label.
/// It is immutable after construction.
#[derive(Debug)]
pub struct Schema {
    /// Types by label.
    types: HashMap<Label, Arc<Type>>,
    /// Roles by label.
    roles: HashMap<Label, Role>,
    /// Rules by label.
    rules: HashMap<Label, Rule>,
    /// Roles related by each relation type.
    relates: HashMap<Label, Vec<Label>>,
    /// First id not used by any schema concept.
    next_id: u64,
}

impl Schema {
    pub(crate) fn new(
        types: HashMap<Label, Arc<Type>>,
        roles: HashMap<Label, Role>,
        rules: HashMap<Label, Rule>,
        relates: HashMap<Label, Vec<Label>>,
        next_id: u64,
    ) -> Self {
        Self {
            types,
            roles,
            rules,
            relates,
            next_id,
        }
    }

    // ==================== Type Lookups ====================

    /// Get a type by label.
    pub fn get_type(&self, label: &str) -> Option<&Arc<Type>> {
        self.types.get(&Label::from(label))
    }

    pub fn get_entity_type(&self, label: &str) -> Option<EntityType> {
        self.get_type(label).cloned().and_then(EntityType::new)
    }

    pub fn get_relation_type(&self, label: &str) -> Option<RelationType> {
        self.get_type(label).cloned().and_then(RelationType::new)
    }

    pub fn get_attribute_type(&self, label: &str) -> Option<AttributeType> {
        self.get_type(label).cloned().and_then(AttributeType::new)
    }

    // ==================== Role / Rule Lookups ====================

    pub fn get_role(&self, label: &str) -> Option<&Role> {
        self.roles.get(&Label::from(label))
    }

    pub fn get_rule(&self, label: &str) -> Option<&Rule> {
        self.rules.get(&Label::from(label))
    }

    /// Roles related by a relation type.
    pub fn roles_of(&self, relation_type: &str) -> impl Iterator<Item = &Role> {
        self.relates
            .get(&Label::from(relation_type))
            .into_iter()
            .flatten()
            .filter_map(|label| self.roles.get(label))
    }

    /// Any schema concept by label.
    pub fn schema_concept(&self, label: &str) -> Option<SchemaConcept> {
        let label = Label::from(label);
        if let Some(ty) = self.types.get(&label) {
            return Some(SchemaConcept::Type(ty.clone()));
        }
        if let Some(role) = self.roles.get(&label) {
            return Some(SchemaConcept::Role(role.clone()));
        }
        self.rules.get(&label).cloned().map(SchemaConcept::Rule)
    }

    /// First concept id free for instances.
    pub fn next_concept_id(&self) -> ConceptId {
        ConceptId::new(self.next_id)
    }
}
