//! Read access to persisted instances.

use crate::{Casting, GraphResult, Relation, Thing, Type};

/// Read contract over the instance graph.
///
/// Lifecycle hooks that re-validate existing instances walk the graph through
/// this trait; they never write to it.
pub trait ConceptReader {
    /// All current instances of `ty`.
    fn instances(&self, ty: &Type) -> GraphResult<Vec<Thing>>;

    /// Castings held by a reified relation.
    fn relation_castings(&self, relation: &Relation) -> GraphResult<Vec<Casting>>;

    /// Castings in which `thing` is the role player.
    fn castings_played(&self, thing: &Thing) -> GraphResult<Vec<Casting>>;
}
