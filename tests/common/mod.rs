//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use edu_client::adapters::{FileKeyValueStore, InMemoryStore, ReqwestHttpClient};
use edu_client::gateway::ApiGateway;
use edu_client::session::{SessionStore, User, TOKEN_KEY, USER_KEY};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_TOKEN: &str = "test-token-12345";

pub fn student() -> User {
    User::new("user_1", "student")
        .with_name("Sam")
        .with_email("sam@example.com")
}

pub fn teacher() -> User {
    User::new("user_2", "teacher")
        .with_name("Ada")
        .with_email("ada@example.com")
}

/// Storage already holding a signed-in session for `user`.
pub fn signed_in_storage(user: &User) -> InMemoryStore {
    let encoded = serde_json::to_string(user).unwrap();
    InMemoryStore::with_entries([(TOKEN_KEY, TEST_TOKEN), (USER_KEY, encoded.as_str())])
}

/// A reqwest-backed gateway pointed at `base_url` with its own session.
pub fn gateway(base_url: &str, storage: InMemoryStore) -> ApiGateway {
    let session = SessionStore::load(Arc::new(storage));
    ApiGateway::new(base_url, Arc::new(ReqwestHttpClient::new()), session)
}

/// A file store inside `dir`.
pub fn file_store(dir: &TempDir) -> FileKeyValueStore {
    FileKeyValueStore::at_path(dir.path().join(".edu-client").join("session.json"))
}

/// The `{data, meta}` envelope the backend wraps payloads in.
pub fn envelope(data: Value) -> Value {
    json!({ "data": data, "meta": {} })
}

pub fn auth_payload(token: &str, user: &User) -> Value {
    envelope(json!({ "token": token, "user": user }))
}
