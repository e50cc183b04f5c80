use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A raw record: an open mapping from field name to JSON value.
pub type Record = Map<String, Value>;

/// Records partitioned by type-name, then keyed by id.
///
/// Relationships inside records are bare identifiers. Ids are addressed by
/// their string form, the same way JSON object keys are, so the numeric
/// identifier `2` refers to the record stored under `"2"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedStore(BTreeMap<String, BTreeMap<String, Record>>);

impl NormalizedStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the one it replaced.
    pub fn insert(
        &mut self,
        entity_type: impl Into<String>,
        id: impl Into<String>,
        record: Record,
    ) -> Option<Record> {
        self.0
            .entry(entity_type.into())
            .or_default()
            .insert(id.into(), record)
    }

    /// Registers a type with no records yet.
    pub fn insert_type(&mut self, entity_type: impl Into<String>) {
        self.0.entry(entity_type.into()).or_default();
    }

    /// Looks up a single record.
    pub fn get(&self, entity_type: &str, id: &str) -> Option<&Record> {
        self.0.get(entity_type).and_then(|records| records.get(id))
    }

    /// All records of one type, keyed by id.
    pub fn records(&self, entity_type: &str) -> Option<&BTreeMap<String, Record>> {
        self.0.get(entity_type)
    }

    pub fn contains_type(&self, entity_type: &str) -> bool {
        self.0.contains_key(entity_type)
    }

    /// Type-names present in the store, in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates `(type-name, records-by-id)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Record>)> {
        self.0.iter().map(|(t, records)| (t.as_str(), records))
    }

    /// Total number of records across all types.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
