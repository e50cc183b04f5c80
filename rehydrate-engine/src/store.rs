//! The denormalized result store.
//!
//! Records live in an arena and relationships are [`NodeId`] handles into it,
//! so cyclic graphs need neither reference counting nor recursion. Two links
//! to the same `(type, id)` always carry the same `NodeId`.

use crate::error::FieldLocation;
use crate::view::RecordRef;
use rehydrate_model::Record;
use serde_json::Value;
use std::collections::BTreeMap;

/// Handle to a record inside a [`DenormalizedStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One resolved identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Link {
    /// The referenced record.
    Resolved(NodeId),
    /// The raw identifier was JSON `null`: no relationship.
    Null,
    /// No record exists under the identifier: a broken relationship.
    Dangling { id: String },
}

impl Link {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::Resolved(node) => Some(*node),
            Self::Null | Self::Dangling { .. } => None,
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Self::Dangling { .. })
    }
}

/// A field of a denormalized record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Copied unchanged from the raw record.
    Raw(Value),
    /// A resolved entity relationship.
    One(Link),
    /// A resolved list-shaped collection, in input order.
    List(Vec<Link>),
    /// A resolved map-shaped collection, with the input's keys.
    Keyed(BTreeMap<String, Link>),
}

impl FieldValue {
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Self::Raw(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Raw(_))
    }
}

/// A lookup-miss recorded under [`MissingReferencePolicy::Mark`](crate::MissingReferencePolicy::Mark).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingLink {
    pub location: FieldLocation,
    pub target: String,
    pub target_id: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) entity_type: String,
    pub(crate) id: String,
    pub(crate) fields: BTreeMap<String, FieldValue>,
}

/// Same `(type, id)` population as the input store, with relationship fields
/// replaced by links to other records of this store.
#[derive(Debug, Clone, Default)]
pub struct DenormalizedStore {
    nodes: Vec<Node>,
    index: BTreeMap<String, BTreeMap<String, NodeId>>,
    dangling: Vec<DanglingLink>,
}

impl DenormalizedStore {
    pub(crate) fn with_capacity(records: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(records),
            index: BTreeMap::new(),
            dangling: Vec::new(),
        }
    }

    pub(crate) fn insert_type(&mut self, entity_type: &str) {
        self.index.entry(entity_type.to_string()).or_default();
    }

    /// Allocates a node holding a shallow copy of `record`.
    pub(crate) fn materialize(&mut self, entity_type: &str, id: &str, record: &Record) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(Node {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
            fields: record
                .iter()
                .map(|(name, value)| (name.clone(), FieldValue::Raw(value.clone())))
                .collect(),
        });
        self.index
            .entry(entity_type.to_string())
            .or_default()
            .insert(id.to_string(), node);
        node
    }

    pub(crate) fn type_index(&self, entity_type: &str) -> Option<&BTreeMap<String, NodeId>> {
        self.index.get(entity_type)
    }

    pub(crate) fn assign(&mut self, node: NodeId, field: String, value: FieldValue) {
        self.nodes[node.0].fields.insert(field, value);
    }

    pub(crate) fn record_dangling(&mut self, links: impl IntoIterator<Item = DanglingLink>) {
        self.dangling.extend(links);
    }

    pub(crate) fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    /// Looks up a record by type and id.
    pub fn get(&self, entity_type: &str, id: &str) -> Option<RecordRef<'_>> {
        self.type_index(entity_type)
            .and_then(|ids| ids.get(id))
            .map(|&node| RecordRef::new(self, node))
    }

    /// Looks up a record by handle. Handles from another store may miss.
    pub fn get_node(&self, node: NodeId) -> Option<RecordRef<'_>> {
        (node.0 < self.nodes.len()).then(|| RecordRef::new(self, node))
    }

    pub fn contains(&self, entity_type: &str, id: &str) -> bool {
        self.get(entity_type, id).is_some()
    }

    /// Type-names present in the store, in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// Ids of one type, in sorted order.
    pub fn ids(&self, entity_type: &str) -> impl Iterator<Item = &str> {
        self.type_index(entity_type)
            .into_iter()
            .flat_map(|ids| ids.keys().map(String::as_str))
    }

    /// All records of one type, in id order.
    pub fn records(&self, entity_type: &str) -> impl Iterator<Item = RecordRef<'_>> {
        self.type_index(entity_type)
            .into_iter()
            .flat_map(|ids| ids.values().map(|&node| RecordRef::new(self, node)))
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every lookup-miss seen while resolving.
    pub fn dangling_links(&self) -> &[DanglingLink] {
        &self.dangling
    }
}
