//! Transaction harness over the fixture schema.

use std::sync::Arc;

use strand_cache::CacheProvider;
use strand_core::{
    Attribute, ConceptId, Entity, ImplicitType, Label, Relation, RelationEdge, Thing, TxId, Type,
    Value,
};
use strand_dedup::AttributeDedup;
use strand_graph::Graph;
use strand_observer::{ConceptObserver, TransactionContext};
use strand_registry::{Schema, SchemaBuilder};

use crate::doubles::{Call, CallLog, RecordingAnswerCache, RecordingDedup, RecordingRuleCache};

/// Schema shared by the integration tests.
///
/// - `person` entity owning `age` and `name`
/// - `user` entity keyed by `email`
/// - `friendship` relation relating `friend`
/// - `employment` relation relating `employee` and `employer`
/// - rule `transitive-friendship`
pub fn fixture_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder
        .add_attribute_type("age")
        .done()
        .expect("age type");
    builder
        .add_attribute_type("name")
        .done()
        .expect("name type");
    builder
        .add_attribute_type("email")
        .done()
        .expect("email type");
    builder
        .add_entity_type("person")
        .has("age")
        .has("name")
        .done()
        .expect("person type");
    builder
        .add_entity_type("user")
        .key("email")
        .done()
        .expect("user type");
    builder
        .add_relation_type("friendship")
        .relates("friend")
        .done()
        .expect("friendship type");
    builder
        .add_relation_type("employment")
        .relates("employee")
        .relates("employer")
        .done()
        .expect("employment type");
    builder
        .add_rule("transitive-friendship")
        .expect("rule");
    builder.build()
}

/// One transaction over the fixture schema, wired to recording doubles.
pub struct Harness {
    pub schema: Schema,
    pub graph: Graph,
    pub log: CallLog,
    pub context: TransactionContext,
}

impl Harness {
    /// Harness with recording rule cache, answer cache and dedup coordinator.
    pub fn new() -> Self {
        let log = CallLog::new();
        Self::with_dedup(log.clone(), Arc::new(RecordingDedup::new(log)))
    }

    /// Harness whose dedup coordinator is `dedup`; `log` receives the cache calls.
    pub fn with_dedup(log: CallLog, dedup: Arc<dyn AttributeDedup>) -> Self {
        let caches = CacheProvider::new(
            Arc::new(RecordingRuleCache::new(log.clone())),
            Arc::new(RecordingAnswerCache::new(log.clone())),
        );
        Self::with_caches(log, caches, dedup)
    }

    pub fn with_caches(log: CallLog, caches: CacheProvider, dedup: Arc<dyn AttributeDedup>) -> Self {
        let schema = fixture_schema();
        let graph = Graph::with_starting_id(schema.next_concept_id());
        Self {
            schema,
            graph,
            log,
            context: TransactionContext::new(TxId::from("tx-1"), caches, dedup),
        }
    }

    pub fn observer(&mut self) -> ConceptObserver<'_> {
        self.context.observer()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.calls()
    }

    pub fn tx(&self) -> TxId {
        self.context.tx().clone()
    }

    pub fn ty(&self, label: &str) -> Arc<Type> {
        self.schema
            .get_type(label)
            .cloned()
            .unwrap_or_else(|| panic!("fixture has no type {}", label))
    }

    pub fn delta(&self, label: &str) -> i64 {
        self.context.statistics().delta(&Label::from(label))
    }

    // ========== Instance Factories ==========

    /// A new entity, stored in the graph.
    pub fn entity(&mut self, label: &str) -> Entity {
        let entity = Entity::new(self.graph.alloc_id(), self.ty(label));
        self.graph.insert(entity.clone());
        entity
    }

    /// A new attribute, stored in the graph.
    pub fn attribute(&mut self, label: &str, value: impl Into<Value>) -> Attribute {
        let attribute = Attribute::new(self.graph.alloc_id(), self.ty(label), value);
        self.graph.insert(attribute.clone());
        attribute
    }

    /// A new reified relation with the given role players, stored in the graph.
    pub fn relation(&mut self, label: &str, players: &[(&str, Thing)]) -> Relation {
        let mut relation = Relation::new(self.graph.alloc_id(), self.ty(label));
        for (role, player) in players {
            relation = relation.with_role_player(*role, player.clone());
        }
        self.graph.insert(relation.clone());
        relation
    }

    /// The `@key-<attr>` relation binding `owner` to `key`.
    pub fn key_relation(&mut self, owner: &Entity, key: &Attribute) -> Relation {
        let attribute_type = key.ty.label.clone();
        let relation_type = ImplicitType::Key.label(&attribute_type);
        let players = [
            (
                ImplicitType::KeyOwner.label(&attribute_type),
                Thing::from(owner.clone()),
            ),
            (
                ImplicitType::KeyValue.label(&attribute_type),
                Thing::from(key.clone()),
            ),
        ];
        let mut relation = Relation::new(self.graph.alloc_id(), self.ty(relation_type.as_str()));
        for (role, player) in players {
            relation = relation.with_role_player(role, player);
        }
        self.graph.insert(relation.clone());
        relation
    }

    /// A binary edge of `label` between two existing concepts.
    pub fn edge(&mut self, label: &str, owner: ConceptId, value: ConceptId) -> RelationEdge {
        RelationEdge::new(self.graph.alloc_id(), self.ty(label), owner, value)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
