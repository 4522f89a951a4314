//! Error types for the education client.
//!
//! [`GatewayError`] is what callers of the gateway see. Transport and storage
//! failures convert into it through `From`, so `?` works across layers.

mod category;
mod gateway;
mod session;

pub use category::ErrorCategory;
pub use gateway::{GatewayError, SinkError, REQUEST_FAILED};
pub use session::SessionError;

/// Result alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
