//! Shared fixtures for denormalization tests.

#![allow(dead_code)]

use rehydrate_engine::rehydrate_model::{EntitySchema, FieldDescriptor, NormalizedStore, SchemaMap};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; set `RUST_LOG` to see engine logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parses a `{type: {id: record}}` JSON literal into a store.
pub fn store(value: Value) -> NormalizedStore {
    serde_json::from_value(value).expect("fixture store must be well-formed")
}

/// Two users who are each other's best friend.
pub fn best_friends_store() -> NormalizedStore {
    store(json!({
        "users": {
            "1": {"name": "A", "bestFriendId": 2},
            "2": {"name": "B", "bestFriendId": 1}
        }
    }))
}

pub fn best_friends_schemas() -> SchemaMap {
    SchemaMap::new().register(
        "users",
        EntitySchema::new("users")
            .with_field("bestFriend", FieldDescriptor::entity("users").resolve_by_key("bestFriendId")),
    )
}

/// Posts with an author, list-shaped comments and map-shaped translations.
pub fn blog_store() -> NormalizedStore {
    store(json!({
        "users": {
            "u1": {"name": "Ada"},
            "u2": {"name": "Grace"}
        },
        "posts": {
            "10": {
                "title": "Hello",
                "authorId": "u1",
                "commentIds": [1, 2],
                "commentsByLang": {"en": 1, "fr": 2}
            }
        },
        "comments": {
            "1": {"body": "first", "authorId": "u2", "postId": 10},
            "2": {"body": "second", "authorId": "u1", "postId": 10}
        }
    }))
}

pub fn blog_schemas() -> SchemaMap {
    SchemaMap::new()
        .register("users", EntitySchema::new("users"))
        .register(
            "posts",
            EntitySchema::new("posts")
                .with_field("author", FieldDescriptor::entity("users").resolve_by_key("authorId"))
                .with_field("comments", FieldDescriptor::iterable("comments").resolve_by_key("commentIds"))
                .with_field("commentsByLang", FieldDescriptor::iterable("comments")),
        )
        .register(
            "comments",
            EntitySchema::new("comments")
                .with_field("author", FieldDescriptor::entity("users").resolve_by_key("authorId"))
                .with_field("post", FieldDescriptor::entity("posts").resolve_by_key("postId")),
        )
}
