//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileKeyValueStore`] - JSON file storage for the session
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses and chunked streams
//! - [`mock::InMemoryStore`] - In-memory key-value storage

pub mod file_store;
pub mod mock;
pub mod reqwest_http;

pub use file_store::FileKeyValueStore;
pub use mock::{InMemoryStore, MockHttpClient, MockResponse};
pub use reqwest_http::ReqwestHttpClient;
