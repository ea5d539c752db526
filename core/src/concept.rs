//! The concept hierarchy.
//!
//! Concepts come in two disjoint kinds: schema concepts (types, roles, rules)
//! and things (entities, relations, attributes). Both are closed enums with
//! narrowing accessors. Every concept is identified by its [`ConceptId`];
//! equality and hashing only look at the id.

use crate::{ConceptId, ImplicitType, Label, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

macro_rules! identity_by_id {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PartialEq for $ty {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }

            impl Eq for $ty {}

            impl Hash for $ty {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )+
    };
}

// ==================== Schema Concepts ====================

/// Meta kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Entity,
    Relation,
    Attribute,
}

/// A type that things are instances of.
#[derive(Debug, Clone)]
pub struct Type {
    /// Unique identifier.
    pub id: ConceptId,
    /// Type label.
    pub label: Label,
    /// Entity, relation or attribute type.
    pub kind: TypeKind,
    /// Whether this type is abstract (cannot have direct instances).
    pub is_abstract: bool,
    /// Whether this type was generated by the system (`@has-*`, `@key-*`).
    pub implicit: bool,
    /// Attribute types this type declares as keys.
    pub keys: Vec<Label>,
}

impl Type {
    pub fn new(id: ConceptId, label: impl Into<Label>, kind: TypeKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
            is_abstract: false,
            implicit: false,
            keys: Vec::new(),
        }
    }

    pub fn with_key(mut self, attribute_type: impl Into<Label>) -> Self {
        self.keys.push(attribute_type.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// Whether any key constraint is declared on this type.
    pub fn has_keys(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Whether this is the system-generated relation type backing a key.
    pub fn is_key_relation(&self) -> bool {
        self.implicit && self.kind == TypeKind::Relation && ImplicitType::is_key(&self.label)
    }
}

identity_by_id!(Type);

macro_rules! narrow_type {
    ($(#[$doc:meta])* $name:ident => $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(Arc<Type>);

        impl $name {
            /// Narrow a type, returning `None` if it is of another kind.
            pub fn new(ty: Arc<Type>) -> Option<Self> {
                (ty.kind == TypeKind::$kind).then(|| Self(ty))
            }

            pub fn as_type(&self) -> &Arc<Type> {
                &self.0
            }

            pub fn into_type(self) -> Arc<Type> {
                self.0
            }
        }

        impl Deref for $name {
            type Target = Type;

            fn deref(&self) -> &Type {
                &self.0
            }
        }
    };
}

narrow_type!(
    /// A type whose instances are entities.
    EntityType => Entity
);
narrow_type!(
    /// A type whose instances are relations.
    RelationType => Relation
);
narrow_type!(
    /// A type whose instances are attributes.
    AttributeType => Attribute
);

/// A role that things play in relations.
#[derive(Debug, Clone)]
pub struct Role {
    pub id: ConceptId,
    pub label: Label,
    pub implicit: bool,
}

impl Role {
    pub fn new(id: ConceptId, label: impl Into<Label>) -> Self {
        Self {
            id,
            label: label.into(),
            implicit: false,
        }
    }
}

identity_by_id!(Role);

/// An inference rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: ConceptId,
    pub label: Label,
}

impl Rule {
    pub fn new(id: ConceptId, label: impl Into<Label>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

identity_by_id!(Rule);

/// A schema-level concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaConcept {
    Type(Arc<Type>),
    Role(Role),
    Rule(Rule),
}

impl SchemaConcept {
    pub fn id(&self) -> ConceptId {
        match self {
            SchemaConcept::Type(ty) => ty.id,
            SchemaConcept::Role(role) => role.id,
            SchemaConcept::Rule(rule) => rule.id,
        }
    }

    pub fn label(&self) -> &Label {
        match self {
            SchemaConcept::Type(ty) => &ty.label,
            SchemaConcept::Role(role) => &role.label,
            SchemaConcept::Rule(rule) => &rule.label,
        }
    }

    pub fn as_type(&self) -> Option<&Arc<Type>> {
        match self {
            SchemaConcept::Type(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<&Role> {
        match self {
            SchemaConcept::Role(role) => Some(role),
            _ => None,
        }
    }

    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            SchemaConcept::Rule(rule) => Some(rule),
            _ => None,
        }
    }
}

impl From<Arc<Type>> for SchemaConcept {
    fn from(ty: Arc<Type>) -> Self {
        SchemaConcept::Type(ty)
    }
}

impl From<Role> for SchemaConcept {
    fn from(role: Role) -> Self {
        SchemaConcept::Role(role)
    }
}

impl From<Rule> for SchemaConcept {
    fn from(rule: Rule) -> Self {
        SchemaConcept::Rule(rule)
    }
}

// ==================== Things ====================

/// An entity instance.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: ConceptId,
    pub ty: Arc<Type>,
    pub inferred: bool,
}

impl Entity {
    pub fn new(id: ConceptId, ty: Arc<Type>) -> Self {
        Self {
            id,
            ty,
            inferred: false,
        }
    }

    pub fn inferred(mut self) -> Self {
        self.inferred = true;
        self
    }
}

identity_by_id!(Entity);

/// A role player of a relation: the thing and the role it plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RolePlayer {
    pub role: Label,
    pub player: Thing,
}

/// A relation instance.
///
/// A relation is either backed by a binary [`RelationEdge`] or reified as a
/// full node with castings. Either way the snapshot carries its role players.
#[derive(Debug, Clone)]
pub struct Relation {
    pub id: ConceptId,
    pub ty: Arc<Type>,
    pub inferred: bool,
    /// Whether the relation is materialised as a node with castings.
    pub reified: bool,
    pub role_players: Vec<RolePlayer>,
}

impl Relation {
    pub fn new(id: ConceptId, ty: Arc<Type>) -> Self {
        Self {
            id,
            ty,
            inferred: false,
            reified: true,
            role_players: Vec::new(),
        }
    }

    pub fn inferred(mut self) -> Self {
        self.inferred = true;
        self
    }

    /// Mark the relation as backed by a relation edge.
    pub fn edge_backed(mut self) -> Self {
        self.reified = false;
        self
    }

    pub fn with_role_player(mut self, role: impl Into<Label>, player: impl Into<Thing>) -> Self {
        self.role_players.push(RolePlayer {
            role: role.into(),
            player: player.into(),
        });
        self
    }

    pub fn role_players(&self) -> impl Iterator<Item = &Thing> {
        self.role_players.iter().map(|rp| &rp.player)
    }
}

identity_by_id!(Relation);

/// An attribute instance.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub id: ConceptId,
    pub ty: Arc<Type>,
    pub inferred: bool,
    pub value: Value,
}

impl Attribute {
    pub fn new(id: ConceptId, ty: Arc<Type>, value: impl Into<Value>) -> Self {
        Self {
            id,
            ty,
            inferred: false,
            value: value.into(),
        }
    }

    pub fn inferred(mut self) -> Self {
        self.inferred = true;
        self
    }
}

identity_by_id!(Attribute);

/// An instance-level concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Thing {
    Entity(Entity),
    Relation(Relation),
    Attribute(Attribute),
}

impl Thing {
    pub fn id(&self) -> ConceptId {
        match self {
            Thing::Entity(e) => e.id,
            Thing::Relation(r) => r.id,
            Thing::Attribute(a) => a.id,
        }
    }

    /// The type this thing is an instance of.
    pub fn ty(&self) -> &Arc<Type> {
        match self {
            Thing::Entity(e) => &e.ty,
            Thing::Relation(r) => &r.ty,
            Thing::Attribute(a) => &a.ty,
        }
    }

    pub fn is_inferred(&self) -> bool {
        match self {
            Thing::Entity(e) => e.inferred,
            Thing::Relation(r) => r.inferred,
            Thing::Attribute(a) => a.inferred,
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Thing::Attribute(_))
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Thing::Relation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Thing::Attribute(a) => Some(a),
            _ => None,
        }
    }
}

impl From<Entity> for Thing {
    fn from(entity: Entity) -> Self {
        Thing::Entity(entity)
    }
}

impl From<Relation> for Thing {
    fn from(relation: Relation) -> Self {
        Thing::Relation(relation)
    }
}

impl From<Attribute> for Thing {
    fn from(attribute: Attribute) -> Self {
        Thing::Attribute(attribute)
    }
}

/// Any concept, schema or instance level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Concept {
    Schema(SchemaConcept),
    Thing(Thing),
}

impl Concept {
    pub fn id(&self) -> ConceptId {
        match self {
            Concept::Schema(s) => s.id(),
            Concept::Thing(t) => t.id(),
        }
    }

    pub fn as_thing(&self) -> Option<&Thing> {
        match self {
            Concept::Thing(t) => Some(t),
            Concept::Schema(_) => None,
        }
    }
}

impl From<SchemaConcept> for Concept {
    fn from(concept: SchemaConcept) -> Self {
        Concept::Schema(concept)
    }
}

impl From<Thing> for Concept {
    fn from(thing: Thing) -> Self {
        Concept::Thing(thing)
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Schema(s) => write!(f, "{}({})", s.label(), s.id()),
            Concept::Thing(t) => write!(f, "{}:{}", t.id(), t.ty().label),
        }
    }
}

// ==================== Edges ====================

/// A binary, non-reified relation.
///
/// Relation edges connect an owner and a value directly; they are only
/// wrapped in a reified [`Relation`] when something needs the full node.
#[derive(Debug, Clone)]
pub struct RelationEdge {
    pub id: ConceptId,
    pub ty: Arc<Type>,
    pub owner: ConceptId,
    pub value: ConceptId,
    pub inferred: bool,
}

impl RelationEdge {
    pub fn new(id: ConceptId, ty: Arc<Type>, owner: ConceptId, value: ConceptId) -> Self {
        Self {
            id,
            ty,
            owner,
            value,
            inferred: false,
        }
    }

    pub fn inferred(mut self) -> Self {
        self.inferred = true;
        self
    }
}

identity_by_id!(RelationEdge);

/// One role-player assignment: `player` plays `role` in `relation`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Casting {
    pub relation: ConceptId,
    pub relation_type: Label,
    pub role: Label,
    pub player: ConceptId,
}

impl Casting {
    pub fn new(
        relation: ConceptId,
        relation_type: impl Into<Label>,
        role: impl Into<Label>,
        player: ConceptId,
    ) -> Self {
        Self {
            relation,
            relation_type: relation_type.into(),
            role: role.into(),
            player,
        }
    }
}

impl fmt::Display for Casting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] -{}-> {}",
            self.relation, self.relation_type, self.role, self.player
        )
    }
}
