//! Core data model for rehydrate.
//!
//! Defines the inputs that the denormalization engine consumes:
//! - [`NormalizedStore`] — records flattened by type and keyed by id, with
//!   relationships stored as bare identifiers
//! - [`EntitySchema`] / [`SchemaMap`] — which fields of each type are relationships
//! - [`Schema`] — the closed set of relationship shapes (entity, iterable, union)
//! - [`FieldDescriptor`] / [`FieldResolve`] — where a field's raw identifier comes from
//!
//! Everything except function resolvers round-trips through JSON, so schemas can
//! be authored next to the data they describe.

mod entity;
mod field;
mod schema;
mod store;

pub use entity::{EntitySchema, PRIVATE_FIELD_MARKER, SchemaMap, is_private_field};
pub use field::{FieldDescriptor, FieldResolve, ResolveFn};
pub use schema::{EntityRef, IterableSchema, Schema, UnionSchema};
pub use store::{NormalizedStore, Record};
