//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that can return predefined
//! responses, chunked streams or errors for testing purposes.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::traits::{
    ChunkStream, HttpClient, HttpError, HttpRequest, Response, StreamingResponse,
};

fn concat(chunks: &[Bytes]) -> Bytes {
    chunks
        .iter()
        .flat_map(|chunk| chunk.iter().copied())
        .collect::<Vec<u8>>()
        .into()
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response (any status)
    Success(Response),
    /// Fail the exchange before any response
    Error(HttpError),
    /// Return a 200 response delivered as these chunks
    Stream(Vec<Bytes>),
    /// Return a response with the given status delivered as chunks
    StreamWithStatus { status: u16, chunks: Vec<Bytes> },
    /// Deliver the chunks, then fail with the error
    StreamThenError { chunks: Vec<Bytes>, error: HttpError },
    /// Deliver the chunks, then never finish
    StreamPending(Vec<Bytes>),
    /// Respond with a status but no incremental body reader
    NoBody(u16),
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use edu_client::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://api.test/courses",
///     MockResponse::Success(Response::new(200, r#"{"data":[]}"#)),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<HttpRequest>>>,
    /// Number of body chunks handed out by streaming responses
    chunks_read: Arc<AtomicUsize>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            chunks_read: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set a response for a specific URL.
    ///
    /// Exact matches win over prefix matches.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Get the most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    /// Number of stream chunks consumed so far.
    pub fn chunks_read(&self) -> usize {
        self.chunks_read.load(Ordering::SeqCst)
    }

    fn record_request(&self, request: &HttpRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = self.responses.lock().unwrap();

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        // Longest prefix first so nested paths can be configured separately
        let mut prefixes: Vec<_> = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .collect();
        prefixes.sort_by_key(|(pattern, _)| std::cmp::Reverse(pattern.len()));
        if let Some((_, response)) = prefixes.first() {
            return Some((*response).clone());
        }

        self.default_response.lock().unwrap().clone()
    }

    fn counted(&self, chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> {
        let counter = Arc::clone(&self.chunks_read);
        futures::stream::iter(chunks).map(move |chunk| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(chunk)
        })
    }

    fn chunk_stream(&self, response: MockResponse) -> Option<(u16, ChunkStream)> {
        let (status, stream): (u16, ChunkStream) = match response {
            MockResponse::Stream(chunks) => (200, Box::pin(self.counted(chunks))),
            MockResponse::StreamWithStatus { status, chunks } => {
                (status, Box::pin(self.counted(chunks)))
            }
            MockResponse::StreamThenError { chunks, error } => {
                let tail = futures::stream::once(async move { Err(error) });
                (200, Box::pin(self.counted(chunks).chain(tail)))
            }
            MockResponse::StreamPending(chunks) => {
                let tail = futures::stream::pending();
                (200, Box::pin(self.counted(chunks).chain(tail)))
            }
            MockResponse::Success(response) => {
                let chunks = if response.body.is_empty() {
                    Vec::new()
                } else {
                    vec![response.body]
                };
                (response.status, Box::pin(self.counted(chunks)))
            }
            MockResponse::Error(_) | MockResponse::NoBody(_) => return None,
        };
        Some((status, stream))
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<Response, HttpError> {
        self.record_request(&request);

        match self.get_response(&request.url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Stream(chunks)) => Ok(Response::new(200, concat(&chunks))),
            Some(MockResponse::StreamWithStatus { status, chunks }) => {
                Ok(Response::new(status, concat(&chunks)))
            }
            Some(MockResponse::StreamThenError { error, .. }) => Err(error),
            Some(MockResponse::StreamPending(_)) => Err(HttpError::Other(
                "Pending stream response on non-stream request".to_string(),
            )),
            Some(MockResponse::NoBody(status)) => Ok(Response::new(status, Bytes::new())),
            None => Err(HttpError::Other(format!(
                "No mock response for URL: {}",
                request.url
            ))),
        }
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<StreamingResponse, HttpError> {
        self.record_request(&request);

        let response = self.get_response(&request.url).ok_or_else(|| {
            HttpError::Other(format!("No mock response for URL: {}", request.url))
        })?;

        match response {
            MockResponse::Error(err) => Err(err),
            MockResponse::NoBody(status) => Ok(StreamingResponse::new(status, None)),
            other => match self.chunk_stream(other) {
                Some((status, stream)) => Ok(StreamingResponse::new(status, Some(stream))),
                None => Err(HttpError::Other("Unsupported mock response".to_string())),
            },
        }
    }
}
