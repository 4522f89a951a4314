//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP exchanges (buffered and streaming)
//! - [`KeyValueStore`] - Persistent string storage for the session

pub mod http;
pub mod storage;

pub use http::{
    get_header, set_header, ChunkStream, FormPart, Headers, HttpClient, HttpError, HttpRequest,
    Method, MultipartForm, RequestBody, Response, StreamingResponse,
};
pub use storage::{KeyValueStore, StorageError};
