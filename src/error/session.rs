//! Errors raised while persisting the session.

use thiserror::Error;

use crate::traits::StorageError;

/// Error type for session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backing key-value store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The user record could not be encoded for storage
    #[error("Failed to encode user record: {0}")]
    Encode(#[from] serde_json::Error),

    /// An update that needs a token was attempted while signed out
    #[error("No active session")]
    NotAuthenticated,
}
