//! Schema-driven denormalization for rehydrate.
//!
//! Takes a [`NormalizedStore`](rehydrate_model::NormalizedStore), where
//! relationships are bare identifiers, and a
//! [`SchemaMap`](rehydrate_model::SchemaMap) describing them, and produces a
//! [`DenormalizedStore`] where every relationship field links to the record it
//! names:
//!
//! - [`denormalize_all`] / [`Denormalizer`] — the two-pass resolver
//! - [`DenormalizedStore`] / [`RecordRef`] — the linked result and borrowed views into it
//! - [`DenormalizeOptions`] — lookup-miss policy and private field marker
//! - [`DenormalizeError`] — every condition that aborts a call
//!
//! The input store is never modified. Cycles resolve because every record is
//! allocated before any field is filled in.

mod engine;
mod error;
mod options;
mod store;
mod view;

pub use engine::{Denormalizer, denormalize_all};
pub use error::{DenormalizeError, DenormalizeResult, FieldLocation};
pub use options::{DenormalizeOptions, MissingReferencePolicy};
pub use store::{DanglingLink, DenormalizedStore, FieldValue, Link, NodeId};
pub use view::RecordRef;

pub use rehydrate_model;
