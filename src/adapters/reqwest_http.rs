//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production HTTP client implementation using
//! reqwest, implementing the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Duration;

use crate::traits::{
    Headers, HttpClient, HttpError, HttpRequest, Method, MultipartForm, RequestBody, Response,
    StreamingResponse,
};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use edu_client::adapters::ReqwestHttpClient;
/// use edu_client::traits::{HttpClient, HttpRequest, Method};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.send(HttpRequest::new(Method::Get, "http://localhost:8000/health")).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client that gives up connecting after `timeout`.
    ///
    /// Only connection setup is bounded; response bodies may take as long as
    /// the server needs. Falls back to default settings if the client cannot
    /// be built.
    pub fn with_connect_timeout(timeout: Duration) -> Self {
        match reqwest::Client::builder().connect_timeout(timeout).build() {
            Ok(client) => Self { client },
            Err(e) => {
                tracing::warn!("Failed to build HTTP client with connect timeout: {}", e);
                Self::new()
            }
        }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    fn convert_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn convert_form(form: MultipartForm) -> Result<reqwest::multipart::Form, HttpError> {
        let mut multipart = reqwest::multipart::Form::new();
        for part in form.parts {
            let mut body = reqwest::multipart::Part::bytes(part.data.to_vec());
            if let Some(filename) = part.filename {
                body = body.file_name(filename);
            }
            if let Some(content_type) = part.content_type {
                body = body
                    .mime_str(&content_type)
                    .map_err(|e| HttpError::Other(format!("Invalid part MIME type: {}", e)))?;
            }
            multipart = multipart.part(part.name, body);
        }
        Ok(multipart)
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn build(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder, HttpError> {
        let builder = self
            .client
            .request(Self::convert_method(request.method), &request.url);
        let builder = Self::apply_headers(builder, &request.headers);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Form(form) => builder.multipart(Self::convert_form(form)?),
        };
        Ok(builder)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, request: HttpRequest) -> Result<Response, HttpError> {
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::convert_headers(response.headers());
        let body = response.bytes().await.map_err(Self::convert_error)?;

        Ok(Response::with_headers(status, response_headers, body))
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<StreamingResponse, HttpError> {
        let response = self
            .build(request)?
            .send()
            .await
            .map_err(Self::convert_error)?;

        let status = response.status().as_u16();
        let headers = Self::convert_headers(response.headers());

        let stream = response.bytes_stream().map(|result| {
            result.map_err(|e| {
                if e.is_timeout() {
                    HttpError::Timeout(e.to_string())
                } else {
                    HttpError::Io(e.to_string())
                }
            })
        });

        Ok(StreamingResponse {
            status,
            headers,
            body: Some(Box::pin(stream)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_reqwest_http_client_new() {
        let client = ReqwestHttpClient::new();
        let _inner = client.inner();
    }

    #[test]
    fn test_reqwest_http_client_with_connect_timeout() {
        let client = ReqwestHttpClient::with_connect_timeout(Duration::from_secs(5));
        let _ = client.inner();
    }

    #[test]
    fn test_convert_method() {
        assert_eq!(ReqwestHttpClient::convert_method(Method::Get), reqwest::Method::GET);
        assert_eq!(ReqwestHttpClient::convert_method(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(
            ReqwestHttpClient::convert_method(Method::Delete),
            reqwest::Method::DELETE
        );
    }

    #[test]
    fn test_convert_headers() {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(
            reqwest::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );

        let headers = ReqwestHttpClient::convert_headers(&header_map);
        assert_eq!(
            headers.get("content-type"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_convert_form_rejects_bad_mime() {
        let form = MultipartForm::new().file("file", "a.txt", "not a mime", Bytes::new());
        assert!(ReqwestHttpClient::convert_form(form).is_err());
    }

    #[test]
    fn test_convert_form_accepts_parts() {
        let form = MultipartForm::new()
            .text("title", "Lecture")
            .file("file", "a.pdf", "application/pdf", Bytes::from_static(b"%PDF"));
        assert!(ReqwestHttpClient::convert_form(form).is_ok());
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .send(HttpRequest::new(Method::Get, "http://127.0.0.1:59999/test"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_send_invalid_url() {
        let client = ReqwestHttpClient::new();
        let result = client
            .send(HttpRequest::new(Method::Get, "not-a-valid-url"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_send_streaming_connection_refused() {
        let client = ReqwestHttpClient::new();
        let result = client
            .send_streaming(HttpRequest::new(Method::Post, "http://127.0.0.1:59999/test"))
            .await;
        assert!(result.is_err());
    }
}
