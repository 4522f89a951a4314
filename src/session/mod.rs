//! Authentication session state.
//!
//! A [`Session`] is an immutable snapshot of who is signed in. The
//! [`SessionStore`] owns the live copy, mirrors every change into a
//! [`KeyValueStore`](crate::traits::KeyValueStore) and hands out snapshots to
//! the gateway and the route guard.

mod store;
mod user;

pub use store::{SessionStore, TOKEN_KEY, USER_KEY};
pub use user::User;

/// Snapshot of the current authentication state.
///
/// A user is never present without a token. A token may be present without
/// a user when the stored user record could not be read back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// The signed-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in session.
    pub fn new(token: impl Into<String>, user: Option<User>) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The signed-in user's role, if known.
    pub fn role(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.role.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
