//! Strand Graph Storage
//!
//! In-memory instance storage with indexed access:
//! - Thing storage by concept id
//! - Type index: Find instances by type label
//! - Casting index: Find castings by relation or by role player
//!
//! The graph implements [`strand_core::ConceptReader`], the read contract
//! used by lifecycle hooks that re-validate existing instances.

mod graph;
mod index;

pub use graph::*;
