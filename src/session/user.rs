//! Signed-in user record.

use serde::{Deserialize, Serialize};

/// The user returned by the auth endpoints.
///
/// Only `id` and `role` are required; the guard reads `role` and nothing
/// else. The other fields are kept so a stored record round-trips intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            name: None,
            email: None,
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Whether this user holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}
