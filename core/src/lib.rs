//! Strand Core Types
//!
//! This crate provides the foundational types used throughout Strand:
//! - Identity types (ConceptId, Label, TxId)
//! - Attribute values and their canonical string form
//! - The closed concept hierarchy (schema concepts and things)
//! - Attribute index derivation and implicit type naming
//! - The read contract over persisted instances

mod concept;
mod error;
mod id;
mod index;
mod reader;
mod value;

pub use concept::*;
pub use error::*;
pub use id::*;
pub use index::*;
pub use reader::*;
pub use value::*;
