use crate::field::FieldDescriptor;
use crate::schema::EntityRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field names starting with this character are metadata, never relationships.
pub const PRIVATE_FIELD_MARKER: char = '_';

/// Whether `field_name` is private under `marker`.
pub fn is_private_field(field_name: &str, marker: char) -> bool {
    field_name.starts_with(marker)
}

/// Declares which fields of an entity type are relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    /// Type-name addressing this entity's records in input and result stores.
    pub key: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDescriptor>,
}

impl EntitySchema {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a relationship field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// An entity reference targeting this schema's records.
    pub fn reference(&self) -> EntityRef {
        EntityRef::new(self.key.clone())
    }

    /// Declared fields whose names do not start with `marker`.
    ///
    /// [`PRIVATE_FIELD_MARKER`] is the conventional marker.
    pub fn relationship_fields(&self, marker: char) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .filter(move |(name, _)| !is_private_field(name, marker))
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }
}

/// Entity schemas keyed by the type-name they describe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaMap(BTreeMap<String, EntitySchema>);

impl SchemaMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` under `entity_type`, returning the one it replaced.
    pub fn insert(&mut self, entity_type: impl Into<String>, schema: EntitySchema) -> Option<EntitySchema> {
        self.0.insert(entity_type.into(), schema)
    }

    /// Builder form of [`SchemaMap::insert`].
    #[must_use]
    pub fn register(mut self, entity_type: impl Into<String>, schema: EntitySchema) -> Self {
        self.insert(entity_type, schema);
        self
    }

    pub fn get(&self, entity_type: &str) -> Option<&EntitySchema> {
        self.0.get(entity_type)
    }

    pub fn contains(&self, entity_type: &str) -> bool {
        self.0.contains_key(entity_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntitySchema)> {
        self.0.iter().map(|(t, schema)| (t.as_str(), schema))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
