//! Coarse classification of gateway failures.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (connection, DNS, timeout).
    /// Generally transient and retryable.
    Network,

    /// The server rejected the credentials (HTTP 401/403).
    Auth,

    /// HTTP 5xx responses.
    Server,

    /// HTTP 4xx other than auth, or a response the client could not use.
    Client,

    /// Failures raised by the caller's own code, such as an event handler.
    Caller,

    /// Local persistence failures.
    Storage,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label suitable for log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::Caller => "caller",
            ErrorCategory::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
