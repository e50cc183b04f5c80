use crate::store::{DenormalizedStore, FieldValue, Link, Node, NodeId};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::ptr;

/// A borrowed record of a [`DenormalizedStore`].
///
/// Equality is identity: two refs are equal when they point at the same node
/// of the same store, which is how resolved relationships are compared.
#[derive(Clone, Copy)]
pub struct RecordRef<'a> {
    store: &'a DenormalizedStore,
    node: NodeId,
}

impl<'a> RecordRef<'a> {
    pub(crate) fn new(store: &'a DenormalizedStore, node: NodeId) -> Self {
        Self { store, node }
    }

    fn inner(&self) -> &'a Node {
        self.store.node(self.node)
    }

    pub fn entity_type(&self) -> &'a str {
        &self.inner().entity_type
    }

    pub fn id(&self) -> &'a str {
        &self.inner().id
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn field(&self, name: &str) -> Option<&'a FieldValue> {
        self.inner().fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a FieldValue)> {
        self.inner()
            .fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// An unresolved field's value.
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.field(name).and_then(FieldValue::as_raw)
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.raw(name).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.raw(name).and_then(|v| v.as_bool())
    }

    pub fn get_number(&self, name: &str) -> Option<f64> {
        self.raw(name).and_then(|v| v.as_f64())
    }

    /// The link held by a single-entity field.
    pub fn link(&self, name: &str) -> Option<&'a Link> {
        match self.field(name)? {
            FieldValue::One(link) => Some(link),
            _ => None,
        }
    }

    /// Follows a single-entity field to the related record.
    pub fn entity(&self, name: &str) -> Option<RecordRef<'a>> {
        self.link(name).and_then(|link| self.follow(link))
    }

    /// Follows a list-shaped collection field. Unresolved items are `None`.
    pub fn list(&self, name: &str) -> Option<Vec<Option<RecordRef<'a>>>> {
        match self.field(name)? {
            FieldValue::List(links) => Some(links.iter().map(|link| self.follow(link)).collect()),
            _ => None,
        }
    }

    /// Follows a map-shaped collection field. Unresolved items are `None`.
    pub fn keyed(&self, name: &str) -> Option<BTreeMap<&'a str, Option<RecordRef<'a>>>> {
        match self.field(name)? {
            FieldValue::Keyed(links) => Some(
                links
                    .iter()
                    .map(|(key, link)| (key.as_str(), self.follow(link)))
                    .collect(),
            ),
            _ => None,
        }
    }

    pub fn follow(&self, link: &Link) -> Option<RecordRef<'a>> {
        link.node().and_then(|node| self.store.get_node(node))
    }

    /// Expands this record into nested JSON.
    ///
    /// Relationships are followed up to `max_depth` hops; past that they are
    /// written as `{"$ref": {"type": .., "id": ..}}`. Null and dangling links
    /// become JSON `null`.
    pub fn to_json(&self, max_depth: usize) -> Value {
        let fields = self
            .fields()
            .map(|(name, value)| {
                let expanded = match value {
                    FieldValue::Raw(raw) => raw.clone(),
                    FieldValue::One(link) => self.link_to_json(link, max_depth),
                    FieldValue::List(links) => Value::Array(
                        links
                            .iter()
                            .map(|link| self.link_to_json(link, max_depth))
                            .collect(),
                    ),
                    FieldValue::Keyed(links) => Value::Object(
                        links
                            .iter()
                            .map(|(key, link)| (key.clone(), self.link_to_json(link, max_depth)))
                            .collect(),
                    ),
                };
                (name.to_string(), expanded)
            })
            .collect::<Map<_, _>>();
        Value::Object(fields)
    }

    fn link_to_json(&self, link: &Link, max_depth: usize) -> Value {
        match self.follow(link) {
            None => Value::Null,
            Some(target) if max_depth == 0 => {
                json!({ "$ref": { "type": target.entity_type(), "id": target.id() } })
            }
            Some(target) => target.to_json(max_depth - 1),
        }
    }
}

impl PartialEq for RecordRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.store, other.store) && self.node == other.node
    }
}

impl Eq for RecordRef<'_> {}

impl fmt::Debug for RecordRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordRef")
            .field("entity_type", &self.entity_type())
            .field("id", &self.id())
            .field("node", &self.node)
            .finish()
    }
}
