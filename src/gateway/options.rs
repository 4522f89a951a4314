//! Per-call request options.

use serde_json::Value;

use crate::traits::{set_header, FormPart, Headers, Method, MultipartForm, RequestBody};

/// Method, extra headers and body for one gateway call.
///
/// # Example
///
/// ```ignore
/// let options = RequestOptions::post()
///     .json(json!({"title": "Algebra I"}))
///     .header("X-Request-Id", "42");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    /// Caller headers; these win over the defaults the gateway sets
    pub headers: Headers,
    pub body: RequestBody,
}

impl RequestOptions {
    /// A GET with no body.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get() -> Self {
        Self::new().method(Method::Get)
    }

    pub fn post() -> Self {
        Self::new().method(Method::Post)
    }

    pub fn put() -> Self {
        Self::new().method(Method::Put)
    }

    pub fn patch() -> Self {
        Self::new().method(Method::Patch)
    }

    pub fn delete() -> Self {
        Self::new().method(Method::Delete)
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Send `value` as a JSON body.
    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Send a pre-encoded text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = RequestBody::Text(body.into());
        self
    }

    /// Send a multipart form. The transport sets the boundary header.
    pub fn form(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Form(form);
        self
    }

    /// Append one part, switching the body to multipart if needed.
    pub fn part(mut self, part: FormPart) -> Self {
        match &mut self.body {
            RequestBody::Form(form) => form.parts.push(part),
            _ => self.body = RequestBody::Form(MultipartForm { parts: vec![part] }),
        }
        self
    }

    /// Set a header, replacing any existing one with the same name.
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }
}
