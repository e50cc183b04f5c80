//! Two-pass denormalization.
//!
//! Pass one copies every record into the result store so each `(type, id)`
//! has a node before anything is resolved. Pass two replaces relationship
//! fields with links to those nodes. Resolution never recurses, which is
//! what lets self- and mutually-referential records resolve.

use crate::error::{DenormalizeError, DenormalizeResult, FieldLocation};
use crate::options::{DenormalizeOptions, MissingReferencePolicy};
use crate::store::{DanglingLink, DenormalizedStore, FieldValue, Link, NodeId};
use rehydrate_model::{
    EntityRef, EntitySchema, IterableSchema, NormalizedStore, Record, Schema, SchemaMap,
};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, trace};

/// Denormalizes `store` against `schemas` with default options.
///
/// Lookup-misses become [`Link::Dangling`]; every other failure aborts the
/// call. See [`Denormalizer`] for configured runs.
pub fn denormalize_all(
    store: &NormalizedStore,
    schemas: &SchemaMap,
) -> DenormalizeResult<DenormalizedStore> {
    Denormalizer::default().denormalize(store, schemas)
}

/// A record copied by the materialization pass and awaiting resolution.
struct Pending<'a> {
    node: NodeId,
    entity_type: &'a str,
    id: &'a str,
    record: &'a Record,
    schema: &'a EntitySchema,
}

/// Resolves normalized stores into linked record graphs.
#[derive(Debug, Clone, Default)]
pub struct Denormalizer {
    options: DenormalizeOptions,
}

impl Denormalizer {
    pub fn new(options: DenormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DenormalizeOptions {
        &self.options
    }

    /// Builds the denormalized store. `store` is only read.
    pub fn denormalize(
        &self,
        store: &NormalizedStore,
        schemas: &SchemaMap,
    ) -> DenormalizeResult<DenormalizedStore> {
        let started = Instant::now();
        debug!(
            types = store.types().count(),
            records = store.len(),
            "Denormalizing store"
        );

        let (mut result, pending) = materialize(store, schemas)?;
        for item in &pending {
            self.resolve_record(store, item, &mut result)?;
        }

        debug!(
            records = result.len(),
            dangling = result.dangling_links().len(),
            elapsed_us = started.elapsed().as_micros(),
            "Denormalization complete"
        );
        Ok(result)
    }

    fn resolve_record(
        &self,
        store: &NormalizedStore,
        item: &Pending<'_>,
        result: &mut DenormalizedStore,
    ) -> DenormalizeResult<()> {
        let mut resolved = Vec::new();
        let mut dangling = Vec::new();

        for (field, descriptor) in item.schema.relationship_fields(self.options.private_marker) {
            let Some(raw) = descriptor.raw_value(field, item.record, store) else {
                trace!(entity_type = %item.entity_type, id = %item.id, field = %field, "Skipping absent field");
                continue;
            };
            let location = FieldLocation::new(item.entity_type, item.id, field);
            let value = match &descriptor.schema {
                Some(Schema::Entity(target)) => {
                    FieldValue::One(self.resolve_entity(result, target, &raw, &location, &mut dangling)?)
                }
                Some(Schema::Iterable(iterable)) => {
                    self.resolve_iterable(result, iterable, raw, &location, &mut dangling)?
                }
                Some(Schema::Union(_)) => {
                    return Err(DenormalizeError::UnsupportedUnion { location });
                }
                None => return Err(DenormalizeError::MissingSchema { location }),
            };
            resolved.push((field.to_string(), value));
        }

        for (field, value) in resolved {
            result.assign(item.node, field, value);
        }
        result.record_dangling(dangling);
        Ok(())
    }

    fn resolve_entity(
        &self,
        result: &DenormalizedStore,
        target: &EntityRef,
        raw: &Value,
        location: &FieldLocation,
        dangling: &mut Vec<DanglingLink>,
    ) -> DenormalizeResult<Link> {
        let ids = target_index(result, target, location)?;
        self.link(ids, target, raw, location, dangling)
    }

    fn resolve_iterable(
        &self,
        result: &DenormalizedStore,
        iterable: &IterableSchema,
        raw: Value,
        location: &FieldLocation,
        dangling: &mut Vec<DanglingLink>,
    ) -> DenormalizeResult<FieldValue> {
        let target = iterable.item_schema();
        match raw {
            Value::Array(items) if items.is_empty() => Ok(FieldValue::List(Vec::new())),
            Value::Object(items) if items.is_empty() => Ok(FieldValue::Keyed(BTreeMap::new())),
            Value::Array(items) => {
                let ids = target_index(result, target, location)?;
                items
                    .iter()
                    .map(|item| self.link(ids, target, item, location, dangling))
                    .collect::<DenormalizeResult<Vec<_>>>()
                    .map(FieldValue::List)
            }
            Value::Object(items) => {
                let ids = target_index(result, target, location)?;
                items
                    .iter()
                    .map(|(key, item)| {
                        self.link(ids, target, item, location, dangling)
                            .map(|link| (key.clone(), link))
                    })
                    .collect::<DenormalizeResult<BTreeMap<_, _>>>()
                    .map(FieldValue::Keyed)
            }
            other => Err(DenormalizeError::NotACollection {
                location: location.clone(),
                found: json_kind(&other),
            }),
        }
    }

    /// Resolves one raw identifier against the target's id index.
    fn link(
        &self,
        ids: &BTreeMap<String, NodeId>,
        target: &EntityRef,
        raw: &Value,
        location: &FieldLocation,
        dangling: &mut Vec<DanglingLink>,
    ) -> DenormalizeResult<Link> {
        let id = match raw {
            Value::Null => return Ok(Link::Null),
            Value::String(id) => id.clone(),
            Value::Number(id) => number_key(id),
            other => {
                return Err(DenormalizeError::InvalidIdentifier {
                    location: location.clone(),
                    found: json_kind(other),
                });
            }
        };

        if let Some(&node) = ids.get(&id) {
            return Ok(Link::Resolved(node));
        }

        match self.options.missing_references {
            MissingReferencePolicy::Reject => Err(DenormalizeError::DanglingReference {
                location: location.clone(),
                target: target.key().to_string(),
                target_id: id,
            }),
            MissingReferencePolicy::Mark => {
                debug!(
                    location = %location,
                    target = %target.key(),
                    target_id = %id,
                    "Dangling reference"
                );
                dangling.push(DanglingLink {
                    location: location.clone(),
                    target: target.key().to_string(),
                    target_id: id.clone(),
                });
                Ok(Link::Dangling { id })
            }
        }
    }
}

/// Materialization pass: checks every type has a schema, then allocates a
/// node per record.
fn materialize<'a>(
    store: &'a NormalizedStore,
    schemas: &'a SchemaMap,
) -> DenormalizeResult<(DenormalizedStore, Vec<Pending<'a>>)> {
    let typed = store
        .iter()
        .map(|(entity_type, records)| {
            schemas
                .get(entity_type)
                .map(|schema| (entity_type, records, schema))
                .ok_or_else(|| DenormalizeError::MissingTypeSchema {
                    entity_type: entity_type.to_string(),
                })
        })
        .collect::<DenormalizeResult<Vec<_>>>()?;

    let mut result = DenormalizedStore::with_capacity(store.len());
    let mut pending = Vec::with_capacity(store.len());
    for (entity_type, records, schema) in typed {
        result.insert_type(entity_type);
        for (id, record) in records {
            let node = result.materialize(entity_type, id, record);
            pending.push(Pending {
                node,
                entity_type,
                id,
                record,
                schema,
            });
        }
    }
    trace!(records = pending.len(), "Materialization pass complete");
    Ok((result, pending))
}

fn target_index<'r>(
    result: &'r DenormalizedStore,
    target: &EntityRef,
    location: &FieldLocation,
) -> DenormalizeResult<&'r BTreeMap<String, NodeId>> {
    result
        .type_index(target.key())
        .ok_or_else(|| DenormalizeError::UnknownTargetType {
            location: location.clone(),
            target: target.key().to_string(),
        })
}

/// Formats a numeric id the way it is written as an object key: integral
/// values drop any fractional part, so `2.0` and `2` both address `"2"`.
fn number_key(number: &Number) -> String {
    if let Some(n) = number.as_i64() {
        return n.to_string();
    }
    if let Some(n) = number.as_u64() {
        return n.to_string();
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => (f as i64).to_string(),
        _ => number.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
