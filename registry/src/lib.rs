//! Strand Registry
//!
//! Schema construction and lookup.
//!
//! Responsibilities:
//! - Allocate concept ids for types, roles and rules
//! - Generate the implicit `@has-*` / `@key-*` relation types and roles
//! - Look schema concepts up by label

mod builder;
mod schema;

pub use builder::{RegistryError, SchemaBuilder, TypeBuilder};
pub use schema::Schema;
