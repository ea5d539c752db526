//! SchemaBuilder for constructing an immutable Schema.

use std::collections::HashMap;
use std::sync::Arc;

use strand_core::{ConceptId, ImplicitType, Label, Role, Rule, Type, TypeKind};
use thiserror::Error;

use crate::Schema;

/// Errors that can occur during schema construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate label: {0}")]
    DuplicateLabel(Label),

    #[error("Unknown attribute type: {0}")]
    UnknownAttributeType(Label),

    #[error("Not an attribute type: {0}")]
    NotAnAttributeType(Label),

    #[error("Only relation types relate roles: {0}")]
    RolesOnNonRelation(Label),
}

/// Builder for constructing an immutable Schema.
#[derive(Debug)]
pub struct SchemaBuilder {
    /// Next concept ID to allocate.
    next_id: u64,
    types: HashMap<Label, Arc<Type>>,
    roles: HashMap<Label, Role>,
    rules: HashMap<Label, Rule>,
    relates: HashMap<Label, Vec<Label>>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            types: HashMap::new(),
            roles: HashMap::new(),
            rules: HashMap::new(),
            relates: HashMap::new(),
        }
    }

    /// Add an entity type.
    pub fn add_entity_type(&mut self, label: impl Into<Label>) -> TypeBuilder<'_> {
        TypeBuilder::new(self, label.into(), TypeKind::Entity)
    }

    /// Add a relation type.
    pub fn add_relation_type(&mut self, label: impl Into<Label>) -> TypeBuilder<'_> {
        TypeBuilder::new(self, label.into(), TypeKind::Relation)
    }

    /// Add an attribute type.
    pub fn add_attribute_type(&mut self, label: impl Into<Label>) -> TypeBuilder<'_> {
        TypeBuilder::new(self, label.into(), TypeKind::Attribute)
    }

    /// Add a rule.
    pub fn add_rule(&mut self, label: impl Into<Label>) -> Result<Rule, RegistryError> {
        let label = label.into();
        self.check_free(&label)?;
        let rule = Rule::new(self.alloc_id(), label.clone());
        self.rules.insert(label, rule.clone());
        Ok(rule)
    }

    /// Build the immutable Schema.
    pub fn build(self) -> Schema {
        Schema::new(self.types, self.roles, self.rules, self.relates, self.next_id)
    }

    fn alloc_id(&mut self) -> ConceptId {
        let id = ConceptId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn check_free(&self, label: &Label) -> Result<(), RegistryError> {
        if self.types.contains_key(label)
            || self.roles.contains_key(label)
            || self.rules.contains_key(label)
        {
            return Err(RegistryError::DuplicateLabel(label.clone()));
        }
        Ok(())
    }

    fn check_attribute_type(&self, label: &Label) -> Result<(), RegistryError> {
        match self.types.get(label) {
            Some(ty) if ty.kind == TypeKind::Attribute => Ok(()),
            Some(_) => Err(RegistryError::NotAnAttributeType(label.clone())),
            None => Err(RegistryError::UnknownAttributeType(label.clone())),
        }
    }

    fn ensure_role(&mut self, label: Label, implicit: bool) {
        if !self.roles.contains_key(&label) {
            let mut role = Role::new(self.alloc_id(), label.clone());
            role.implicit = implicit;
            self.roles.insert(label, role);
        }
    }

    /// Create the implicit relation type and roles backing `has` or `key`.
    fn ensure_implicit(&mut self, attribute_type: &Label, key: bool) {
        let (relation, owner, value) = if key {
            (ImplicitType::Key, ImplicitType::KeyOwner, ImplicitType::KeyValue)
        } else {
            (ImplicitType::Has, ImplicitType::HasOwner, ImplicitType::HasValue)
        };

        let relation_label = relation.label(attribute_type);
        if self.types.contains_key(&relation_label) {
            return;
        }

        let roles = vec![owner.label(attribute_type), value.label(attribute_type)];
        for role in &roles {
            self.ensure_role(role.clone(), true);
        }

        let ty = Type::new(self.alloc_id(), relation_label.clone(), TypeKind::Relation).implicit();
        self.types.insert(relation_label.clone(), Arc::new(ty));
        self.relates.insert(relation_label, roles);
    }
}

/// Builder for a type.
pub struct TypeBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    label: Label,
    kind: TypeKind,
    keys: Vec<Label>,
    has: Vec<Label>,
    roles: Vec<Label>,
    is_abstract: bool,
}

impl<'a> TypeBuilder<'a> {
    fn new(builder: &'a mut SchemaBuilder, label: Label, kind: TypeKind) -> Self {
        Self {
            builder,
            label,
            kind,
            keys: Vec::new(),
            has: Vec::new(),
            roles: Vec::new(),
            is_abstract: false,
        }
    }

    /// Declare an attribute type as a key of this type.
    pub fn key(mut self, attribute_type: impl Into<Label>) -> Self {
        self.keys.push(attribute_type.into());
        self
    }

    /// Declare ownership of an attribute type.
    pub fn has(mut self, attribute_type: impl Into<Label>) -> Self {
        self.has.push(attribute_type.into());
        self
    }

    /// Add a role (relation types only).
    pub fn relates(mut self, role: impl Into<Label>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Mark as abstract.
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<Arc<Type>, RegistryError> {
        let builder = self.builder;
        builder.check_free(&self.label)?;
        if !self.roles.is_empty() && self.kind != TypeKind::Relation {
            return Err(RegistryError::RolesOnNonRelation(self.label));
        }
        for attribute_type in self.keys.iter().chain(&self.has) {
            builder.check_attribute_type(attribute_type)?;
        }

        for attribute_type in &self.keys {
            builder.ensure_implicit(attribute_type, true);
        }
        for attribute_type in &self.has {
            builder.ensure_implicit(attribute_type, false);
        }
        for role in &self.roles {
            builder.ensure_role(role.clone(), false);
        }

        let mut ty = Type::new(builder.alloc_id(), self.label.clone(), self.kind);
        ty.keys = self.keys;
        ty.is_abstract = self.is_abstract;
        let ty = Arc::new(ty);

        if self.kind == TypeKind::Relation {
            builder.relates.insert(self.label.clone(), self.roles);
        }
        builder.types.insert(self.label, ty.clone());

        Ok(ty)
    }
}
