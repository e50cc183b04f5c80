use pretty_assertions::assert_eq;
use rehydrate_model::{
    EntityRef, EntitySchema, FieldDescriptor, FieldResolve, IterableSchema, PRIVATE_FIELD_MARKER,
    Schema, SchemaMap, UnionSchema, is_private_field,
};
use serde_json::json;
use std::collections::BTreeMap;

// ── Schema variants ──────────────────────────────────────────────

#[test]
fn entity_ref_exposes_key() {
    let r = EntityRef::new("users");
    assert_eq!(r.key(), "users");
}

#[test]
fn iterable_exposes_item_schema() {
    let s = IterableSchema::new(EntityRef::new("comments"));
    assert_eq!(s.item_schema().key(), "comments");
}

#[test]
fn union_exposes_candidates_and_attribute() {
    let mut schemas = BTreeMap::new();
    schemas.insert("user".to_string(), EntityRef::new("users"));
    schemas.insert("group".to_string(), EntityRef::new("groups"));
    let u = UnionSchema::new(schemas, "type");

    assert_eq!(u.schema_attribute(), "type");
    assert_eq!(u.schemas().len(), 2);
    assert_eq!(u.schemas()["group"].key(), "groups");
}

#[test]
fn schema_shorthands() {
    assert_eq!(Schema::entity("users"), Schema::Entity(EntityRef::new("users")));
    assert_eq!(
        Schema::iterable("comments"),
        Schema::Iterable(IterableSchema::new(EntityRef::new("comments")))
    );
}

#[test]
fn schema_kind_names() {
    assert_eq!(Schema::entity("a").kind(), "entity");
    assert_eq!(Schema::iterable("a").kind(), "iterable");
    assert_eq!(
        Schema::Union(UnionSchema::new(BTreeMap::new(), "type")).kind(),
        "union"
    );
}

// ── EntitySchema ─────────────────────────────────────────────────

fn make_post_schema() -> EntitySchema {
    EntitySchema::new("posts")
        .with_field("author", FieldDescriptor::entity("users").resolve_by_key("authorId"))
        .with_field("comments", FieldDescriptor::iterable("comments").resolve_by_key("commentIds"))
        .with_field("_meta", FieldDescriptor::entity("users"))
}

#[test]
fn entity_schema_key_and_fields() {
    let s = make_post_schema();
    assert_eq!(s.key(), "posts");
    assert_eq!(s.fields.len(), 3);
    assert!(s.field("author").is_some());
    assert!(s.field("missing").is_none());
}

#[test]
fn entity_schema_reference_targets_own_key() {
    let s = make_post_schema();
    assert_eq!(s.reference(), EntityRef::new("posts"));
}

#[test]
fn relationship_fields_skip_private_names() {
    let s = make_post_schema();
    let names: Vec<&str> = s
        .relationship_fields(PRIVATE_FIELD_MARKER)
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["author", "comments"]);
}

#[test]
fn relationship_fields_honor_custom_marker() {
    let s = make_post_schema().with_field("$rev", FieldDescriptor::default());
    let names: Vec<&str> = s.relationship_fields('$').map(|(name, _)| name).collect();
    assert_eq!(names, vec!["_meta", "author", "comments"]);
}

#[test]
fn private_marker_is_underscore() {
    assert_eq!(PRIVATE_FIELD_MARKER, '_');
    assert!(is_private_field("_key", '_'));
    assert!(!is_private_field("key_", '_'));
    assert!(is_private_field("$meta", '$'));
}

#[test]
fn with_field_replaces_existing() {
    let s = EntitySchema::new("posts")
        .with_field("author", FieldDescriptor::entity("users"))
        .with_field("author", FieldDescriptor::entity("admins"));
    assert_eq!(s.fields.len(), 1);
    assert_eq!(s.field("author").unwrap().schema, Some(Schema::entity("admins")));
}

// ── SchemaMap ────────────────────────────────────────────────────

#[test]
fn schema_map_register_and_get() {
    let map = SchemaMap::new()
        .register("posts", make_post_schema())
        .register("users", EntitySchema::new("users"));

    assert_eq!(map.len(), 2);
    assert!(map.contains("users"));
    assert!(!map.contains("comments"));
    assert_eq!(map.get("posts").unwrap().key(), "posts");
}

#[test]
fn schema_map_insert_returns_previous() {
    let mut map = SchemaMap::new();
    assert!(map.insert("users", EntitySchema::new("users")).is_none());
    let previous = map.insert("users", EntitySchema::new("people"));
    assert_eq!(previous.unwrap().key(), "users");
    assert_eq!(map.get("users").unwrap().key(), "people");
}

#[test]
fn schema_map_registered_name_may_differ_from_key() {
    let map = SchemaMap::new().register("people", EntitySchema::new("users"));
    assert_eq!(map.get("people").unwrap().key(), "users");
    assert!(map.get("users").is_none());
}

#[test]
fn empty_schema_map() {
    let map = SchemaMap::new();
    assert!(map.is_empty());
    assert_eq!(map.iter().count(), 0);
}

// ── Serde contract ───────────────────────────────────────────────

#[test]
fn schema_serde_uses_kind_tag() {
    assert_eq!(
        serde_json::to_value(Schema::entity("users")).unwrap(),
        json!({"kind": "entity", "key": "users"})
    );
    assert_eq!(
        serde_json::to_value(Schema::iterable("comments")).unwrap(),
        json!({"kind": "iterable", "item": {"key": "comments"}})
    );
}

#[test]
fn schema_map_deserializes_from_json() {
    let json = json!({
        "users": {
            "key": "users",
            "fields": {
                "bestFriend": {
                    "schema": {"kind": "entity", "key": "users"},
                    "resolve": {"by_key": "bestFriendId"}
                }
            }
        },
        "posts": {
            "key": "posts",
            "fields": {
                "comments": {"schema": {"kind": "iterable", "item": {"key": "comments"}}},
                "subject": {
                    "schema": {
                        "kind": "union",
                        "schemas": {"user": {"key": "users"}},
                        "schema_attribute": "type"
                    }
                }
            }
        },
        "comments": {"key": "comments"}
    });

    let map: SchemaMap = serde_json::from_value(json).unwrap();
    assert_eq!(map.len(), 3);

    let friend = map.get("users").unwrap().field("bestFriend").unwrap();
    assert_eq!(friend.schema, Some(Schema::entity("users")));
    assert_eq!(friend.resolve, FieldResolve::ByKey("bestFriendId".into()));

    let comments = map.get("posts").unwrap().field("comments").unwrap();
    assert_eq!(comments.schema, Some(Schema::iterable("comments")));
    assert_eq!(comments.resolve, FieldResolve::Implicit);

    let subject = map.get("posts").unwrap().field("subject").unwrap();
    assert!(matches!(subject.schema, Some(Schema::Union(_))));

    assert!(map.get("comments").unwrap().fields.is_empty());
}

#[test]
fn descriptor_without_schema_deserializes_to_none() {
    let d: FieldDescriptor = serde_json::from_value(json!({"resolve": {"by_key": "x"}})).unwrap();
    assert_eq!(d.schema, None);
    assert_eq!(d.resolve, FieldResolve::ByKey("x".into()));
}

#[test]
fn implicit_resolve_is_omitted_when_serialized() {
    let json = serde_json::to_value(FieldDescriptor::entity("users")).unwrap();
    assert_eq!(json, json!({"schema": {"kind": "entity", "key": "users"}}));
}

#[test]
fn unknown_schema_kind_is_rejected() {
    let result: Result<Schema, _> = serde_json::from_value(json!({"kind": "graph", "key": "x"}));
    assert!(result.is_err());
}

#[test]
fn schema_map_serde_roundtrip() {
    let original = SchemaMap::new()
        .register("posts", make_post_schema())
        .register("users", EntitySchema::new("users"));
    let json = serde_json::to_string(&original).unwrap();
    let parsed: SchemaMap = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, original);
}
