//! Error type returned by every gateway operation.

use thiserror::Error;

use super::category::ErrorCategory;
use super::session::SessionError;
use crate::traits::HttpError;

/// Boxed error produced by a caller-supplied event handler.
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Message used when a failed response carries no usable detail.
pub const REQUEST_FAILED: &str = "Request failed";

/// Failure of a request or stream issued through the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server answered with a non-success status.
    ///
    /// `message` is the server's `detail` field, or [`REQUEST_FAILED`].
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The transport returned a response without a readable body
    #[error("Streaming not supported by transport")]
    StreamUnsupported,

    /// Transport failure before or during the exchange
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A success response whose body could not be used
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// The event handler failed; the stream was abandoned
    #[error("Event handler failed: {0}")]
    Sink(#[source] SinkError),

    /// The session could not be persisted
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl GatewayError {
    /// Build a request error from a status and optional server detail.
    pub fn request(status: u16, detail: Option<String>) -> Self {
        GatewayError::Request {
            status,
            message: detail.unwrap_or_else(|| REQUEST_FAILED.to_string()),
        }
    }

    /// The HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            GatewayError::Request { status, .. } => match *status {
                401 | 403 => ErrorCategory::Auth,
                s if s >= 500 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            GatewayError::Http(err) if err.is_retryable() => ErrorCategory::Network,
            GatewayError::Http(_) => ErrorCategory::Client,
            GatewayError::StreamUnsupported | GatewayError::InvalidResponse { .. } => {
                ErrorCategory::Client
            }
            GatewayError::Sink(_) => ErrorCategory::Caller,
            GatewayError::Session(_) => ErrorCategory::Storage,
        }
    }

    /// Whether repeating the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            // 429 is a client status but clears on its own
            GatewayError::Request { status: 429, .. } => true,
            _ => self.category().is_retryable(),
        }
    }

    /// Whether the stored token was rejected and the user must sign in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, GatewayError::Request { status: 401, .. })
    }
}
