//! Authenticated API gateway.
//!
//! Every call goes through [`ApiGateway`], which joins the path onto the
//! configured base URL, attaches the session's bearer token, and turns
//! non-success responses into [`GatewayError::Request`].
//!
//! Streams are exposed two ways: [`ApiGateway::stream`] pushes each event
//! into a handler, [`ApiGateway::event_stream`] hands back a
//! [`Stream`](futures::Stream) the caller polls. Dropping either future or
//! the stream closes the connection.

mod auth;
mod envelope;
mod options;

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::ReqwestHttpClient;
use crate::config::GatewayConfig;
use crate::error::{GatewayError, SinkError};
use crate::session::SessionStore;
use crate::sse::{SseDecoder, StreamEvent};
use crate::traits::{set_header, ChunkStream, Headers, HttpClient, HttpRequest};

pub use auth::{AuthResponse, RegisterRequest};
pub use envelope::{error_detail, unwrap_envelope};
pub use options::RequestOptions;

/// Events decoded from one streaming response.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, GatewayError>> + Send>>;

/// Client for the education backend.
///
/// Cloning is cheap; clones share the transport and the session.
#[derive(Clone)]
pub struct ApiGateway {
    base_url: String,
    client: Arc<dyn HttpClient>,
    session: SessionStore,
}

impl ApiGateway {
    pub fn new(
        base_url: impl Into<String>,
        client: Arc<dyn HttpClient>,
        session: SessionStore,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            session,
        }
    }

    /// Build a gateway over reqwest from `config`.
    pub fn from_config(config: &GatewayConfig, session: SessionStore) -> Self {
        let client = ReqwestHttpClient::with_connect_timeout(config.connect_timeout);
        Self::new(config.base_url.clone(), Arc::new(client), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Issue a request and return the unwrapped JSON payload.
    ///
    /// Non-success statuses fail with the server's `detail` message or the
    /// generic "Request failed". A success whose body is empty yields
    /// `Value::Null`; one that is not JSON fails with
    /// [`GatewayError::InvalidResponse`].
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, GatewayError> {
        let request = self.build_request(path, options, false);
        debug!(method = %request.method, url = %request.url, "API request");

        let response = self.client.send(request).await?;
        if !response.is_success() {
            let err = GatewayError::request(response.status, error_detail(&response.body));
            debug!(status = response.status, "API request failed: {}", err);
            return Err(err);
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        let body: Value = serde_json::from_slice(&response.body).map_err(|e| {
            GatewayError::InvalidResponse {
                message: format!("expected JSON body: {}", e),
            }
        })?;
        Ok(unwrap_envelope(body))
    }

    /// Like [`request`](Self::request), deserializing the payload into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, GatewayError> {
        let value = self.request(path, options).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::InvalidResponse {
            message: e.to_string(),
        })
    }

    /// Open a stream and pass every event to `on_event`, in arrival order.
    ///
    /// Resolves once the server closes the stream and the trailing event, if
    /// any, has been delivered. A handler error abandons the stream without
    /// reading further and is returned as [`GatewayError::Sink`].
    pub async fn stream<F>(
        &self,
        path: &str,
        options: RequestOptions,
        mut on_event: F,
    ) -> Result<(), GatewayError>
    where
        F: FnMut(StreamEvent) -> Result<(), SinkError>,
    {
        let mut events = self.event_stream(path, options).await?;
        while let Some(event) = events.next().await {
            on_event(event?).map_err(GatewayError::Sink)?;
        }
        Ok(())
    }

    /// Open a stream and return its events for the caller to poll.
    ///
    /// The body is read only as the returned stream is polled. A transport
    /// error is yielded once and ends the stream.
    pub async fn event_stream(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<EventStream, GatewayError> {
        let body = self.open_stream(path, options).await?;
        Ok(Box::pin(decode_events(body)))
    }

    async fn open_stream(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<ChunkStream, GatewayError> {
        let request = self.build_request(path, options, true);
        debug!(method = %request.method, url = %request.url, "Opening event stream");

        let response = self.client.send_streaming(request).await?;
        if !response.is_success() {
            let detail = match response.body {
                Some(body) => error_detail(&read_to_end(body).await),
                None => None,
            };
            let err = GatewayError::request(response.status, detail);
            debug!(status = response.status, "Event stream rejected: {}", err);
            return Err(err);
        }

        response.body.ok_or_else(|| {
            warn!("Transport returned a stream response without a body");
            GatewayError::StreamUnsupported
        })
    }

    fn build_request(&self, path: &str, options: RequestOptions, streaming: bool) -> HttpRequest {
        let RequestOptions {
            method,
            headers: overrides,
            body,
        } = options;

        let mut headers = Headers::new();
        if !body.is_multipart() {
            set_header(&mut headers, "Content-Type", "application/json");
        }
        if let Some(token) = self.session.token() {
            set_header(&mut headers, "Authorization", format!("Bearer {}", token));
        }
        if streaming {
            set_header(&mut headers, "Accept", "text/event-stream");
        }
        for (name, value) in overrides {
            set_header(&mut headers, &name, value);
        }

        HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

/// Drain an error body. Read failures end the body early; they never fail.
async fn read_to_end(mut body: ChunkStream) -> Vec<u8> {
    let mut buf = Vec::new();
    while let Some(Ok(chunk)) = body.next().await {
        buf.extend_from_slice(&chunk);
    }
    buf
}

struct DecodeState {
    body: ChunkStream,
    decoder: SseDecoder,
    ready: VecDeque<StreamEvent>,
    finished: bool,
}

fn decode_events(body: ChunkStream) -> impl Stream<Item = Result<StreamEvent, GatewayError>> + Send {
    let state = DecodeState {
        body,
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.ready.pop_front() {
                return Some((Ok(event), state));
            }
            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    let events = state.decoder.feed_bytes(&chunk);
                    state.ready.extend(events);
                }
                Some(Err(e)) => {
                    debug!("Event stream failed: {}", e);
                    state.finished = true;
                    state.decoder.reset();
                    return Some((Err(GatewayError::Http(e)), state));
                }
                None => {
                    state.finished = true;
                    let events = state.decoder.finalize();
                    state.ready.extend(events);
                    debug!("Event stream closed by server");
                }
            }
        }
    })
}
