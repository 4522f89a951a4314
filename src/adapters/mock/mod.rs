//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses and streams
//! - [`InMemoryStore`] - In-memory key-value storage

pub mod http;
pub mod storage;

pub use http::{MockHttpClient, MockResponse};
pub use storage::InMemoryStore;
