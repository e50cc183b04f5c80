use crate::schema::{EntityRef, Schema, UnionSchema};
use crate::store::{NormalizedStore, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

type ResolveFnInner = dyn Fn(&Record, &NormalizedStore) -> Option<Value> + Send + Sync;

/// A computed field resolver.
///
/// Receives the original raw record and the whole original store, and returns
/// the raw identifier value to resolve. `None` means the field is absent.
#[derive(Clone)]
pub struct ResolveFn(Arc<ResolveFnInner>);

impl ResolveFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Record, &NormalizedStore) -> Option<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, record: &Record, store: &NormalizedStore) -> Option<Value> {
        (self.0)(record, store)
    }
}

impl fmt::Debug for ResolveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResolveFn(..)")
    }
}

/// Two resolvers are equal only if they share the same closure.
impl PartialEq for ResolveFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Where a relationship field reads its raw identifier value from.
///
/// JSON representation: `"implicit"` or `{"by_key": "bestFriendId"}`.
/// `ByFunction` has no JSON form; serializing it fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldResolve {
    /// Read the record's value under the field's own name.
    #[default]
    Implicit,
    /// Read the record's value under another name.
    ByKey(String),
    /// Compute the value from the record and the full store.
    #[serde(skip)]
    ByFunction(ResolveFn),
}

impl FieldResolve {
    pub fn is_implicit(&self) -> bool {
        matches!(self, Self::Implicit)
    }
}

/// Per-field relationship declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Relationship shape. A descriptor without one cannot be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(default, skip_serializing_if = "FieldResolve::is_implicit")]
    pub resolve: FieldResolve,
}

impl FieldDescriptor {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            resolve: FieldResolve::Implicit,
        }
    }

    /// Single reference to records of type `key`.
    pub fn entity(key: impl Into<String>) -> Self {
        Self::new(Schema::entity(key))
    }

    /// Collection of references to records of type `key`.
    pub fn iterable(key: impl Into<String>) -> Self {
        Self::new(Schema::iterable(key))
    }

    /// Heterogeneous reference discriminated by `schema_attribute`.
    pub fn union(schemas: BTreeMap<String, EntityRef>, schema_attribute: impl Into<String>) -> Self {
        Self::new(Schema::Union(UnionSchema::new(schemas, schema_attribute)))
    }

    /// Read the raw value from `key` instead of the field's own name.
    #[must_use]
    pub fn resolve_by_key(mut self, key: impl Into<String>) -> Self {
        self.resolve = FieldResolve::ByKey(key.into());
        self
    }

    /// Compute the raw value with `f`.
    #[must_use]
    pub fn resolve_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record, &NormalizedStore) -> Option<Value> + Send + Sync + 'static,
    {
        self.resolve = FieldResolve::ByFunction(ResolveFn::new(f));
        self
    }

    /// Extracts the raw value this field resolves, or `None` if absent.
    ///
    /// `field_name` is used for [`FieldResolve::Implicit`]. JSON `null` is a
    /// present value and is returned as `Some(Value::Null)`.
    pub fn raw_value(&self, field_name: &str, record: &Record, store: &NormalizedStore) -> Option<Value> {
        match &self.resolve {
            FieldResolve::Implicit => record.get(field_name).cloned(),
            FieldResolve::ByKey(key) => record.get(key).cloned(),
            FieldResolve::ByFunction(f) => f.call(record, store),
        }
    }
}
