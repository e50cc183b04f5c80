use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The shape of a relationship field.
///
/// The set is closed: the engine matches on it exhaustively, so a new
/// relationship shape is a compile-time decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schema {
    /// A single related record of a named type.
    Entity(EntityRef),
    /// A homogeneous collection of related records, list- or map-shaped.
    Iterable(IterableSchema),
    /// A related record whose type is picked per instance. Declared for
    /// introspection only; the engine refuses to resolve it.
    Union(UnionSchema),
}

impl Schema {
    /// Shorthand for an entity reference to `key`.
    pub fn entity(key: impl Into<String>) -> Self {
        Self::Entity(EntityRef::new(key))
    }

    /// Shorthand for a collection of references to `key`.
    pub fn iterable(key: impl Into<String>) -> Self {
        Self::Iterable(IterableSchema::new(EntityRef::new(key)))
    }

    /// Short lowercase name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Entity(_) => "entity",
            Self::Iterable(_) => "iterable",
            Self::Union(_) => "union",
        }
    }
}

/// Reference to an entity type by its store key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    key: String,
}

impl EntityRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Type-name of the referenced sub-store.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// A collection whose items all reference the same entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterableSchema {
    item: EntityRef,
}

impl IterableSchema {
    pub fn new(item: EntityRef) -> Self {
        Self { item }
    }

    /// The schema every item of the collection resolves against.
    pub fn item_schema(&self) -> &EntityRef {
        &self.item
    }
}

/// A reference whose target type is chosen by a discriminating attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionSchema {
    schemas: BTreeMap<String, EntityRef>,
    schema_attribute: String,
}

impl UnionSchema {
    pub fn new(schemas: BTreeMap<String, EntityRef>, schema_attribute: impl Into<String>) -> Self {
        Self {
            schemas,
            schema_attribute: schema_attribute.into(),
        }
    }

    /// Candidate target schemas, keyed by discriminator value.
    pub fn schemas(&self) -> &BTreeMap<String, EntityRef> {
        &self.schemas
    }

    /// Name of the attribute holding the discriminator value.
    pub fn schema_attribute(&self) -> &str {
        &self.schema_attribute
    }
}
