//! Persistent, shared session store.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use super::{Session, User};
use crate::error::SessionError;
use crate::traits::KeyValueStore;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "edu_token";

/// Storage key holding the JSON-encoded user record.
pub const USER_KEY: &str = "edu_user";

/// Single source of truth for the signed-in user.
///
/// Clones share state: a login through one handle is visible to every other
/// handle on its next [`snapshot`](Self::snapshot).
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: Arc<RwLock<Session>>,
}

impl SessionStore {
    /// Restore the session persisted in `storage`.
    ///
    /// Read failures and a corrupt user record never fail startup: they are
    /// logged and the affected part of the session is left empty.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let session = Self::restore(storage.as_ref());
        debug!(authenticated = session.is_authenticated(), "Session restored");
        Self {
            storage,
            state: Arc::new(RwLock::new(session)),
        }
    }

    fn restore(storage: &dyn KeyValueStore) -> Session {
        let token = match storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return Session::anonymous(),
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                return Session::anonymous();
            }
        };

        let user = match storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Ignoring unreadable stored user: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read stored user: {}", e);
                None
            }
        };

        Session::new(token, user)
    }

    /// Copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    /// The current bearer token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.read().token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Record a successful sign-in.
    ///
    /// The stored token is dropped before the new user record is written and
    /// only put back once that record is persisted, so storage never pairs the
    /// new token with the previous user. If a write fails after the old token
    /// was dropped, the live session is signed out to match storage.
    pub fn login(&self, token: impl Into<String>, user: User) -> Result<(), SessionError> {
        let token = token.into();
        let encoded = serde_json::to_string(&user)?;

        let mut state = self.write();
        self.storage.remove(TOKEN_KEY)?;
        let persisted = self
            .storage
            .set(USER_KEY, &encoded)
            .and_then(|()| self.storage.set(TOKEN_KEY, &token));
        if let Err(e) = persisted {
            warn!("Sign-in not persisted, signing out: {}", e);
            *state = Session::anonymous();
            return Err(e.into());
        }

        info!(user_id = %user.id, role = %user.role, "Session started");
        *state = Session::new(token, Some(user));
        Ok(())
    }

    /// Replace the stored user while keeping the current token.
    pub fn update_user(&self, user: User) -> Result<(), SessionError> {
        let mut state = self.write();
        let token = state
            .token()
            .map(str::to_string)
            .ok_or(SessionError::NotAuthenticated)?;

        self.storage.set(USER_KEY, &serde_json::to_string(&user)?)?;
        debug!(user_id = %user.id, role = %user.role, "Session user updated");
        *state = Session::new(token, Some(user));
        Ok(())
    }

    /// Sign out.
    ///
    /// The live session is cleared even when removing the stored keys fails;
    /// the first storage error is returned.
    pub fn logout(&self) -> Result<(), SessionError> {
        *self.write() = Session::anonymous();

        let token_result = self.storage.remove(TOKEN_KEY);
        let user_result = self.storage.remove(USER_KEY);
        info!("Session cleared");

        token_result?;
        user_result?;
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.read();
        f.debug_struct("SessionStore")
            .field("authenticated", &session.is_authenticated())
            .field("role", &session.role())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;

    fn store_with(entries: &[(&str, &str)]) -> (InMemoryStore, SessionStore) {
        let storage = InMemoryStore::with_entries(entries.iter().copied());
        let sessions = SessionStore::load(Arc::new(storage.clone()));
        (storage, sessions)
    }

    #[test]
    fn test_load_empty_storage() {
        let (_, sessions) = store_with(&[]);
        assert_eq!(sessions.snapshot(), Session::anonymous());
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_load_token_and_user() {
        let (_, sessions) = store_with(&[
            (TOKEN_KEY, "tok"),
            (USER_KEY, r#"{"id":"user_1","role":"teacher"}"#),
        ]);

        let session = sessions.snapshot();
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.role(), Some("teacher"));
    }

    #[test]
    fn test_load_user_without_token_is_ignored() {
        let (_, sessions) = store_with(&[(USER_KEY, r#"{"id":"user_1","role":"teacher"}"#)]);
        assert_eq!(sessions.snapshot(), Session::anonymous());
    }

    #[test]
    fn test_load_corrupt_user_keeps_token() {
        let (_, sessions) = store_with(&[(TOKEN_KEY, "tok"), (USER_KEY, "{not json")]);

        let session = sessions.snapshot();
        assert!(session.is_authenticated());
        assert_eq!(session.user(), None);
    }

    #[test]
    fn test_load_read_failure_is_anonymous() {
        let storage = InMemoryStore::with_entries([(TOKEN_KEY, "tok")]);
        storage.set_read_should_fail(true);
        let sessions = SessionStore::load(Arc::new(storage));
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_login_persists_both_keys() {
        let (storage, sessions) = store_with(&[]);

        sessions.login("tok", User::new("user_1", "student")).unwrap();

        assert_eq!(sessions.token(), Some("tok".to_string()));
        assert_eq!(storage.peek(TOKEN_KEY), Some("tok".to_string()));
        let stored: User = serde_json::from_str(&storage.peek(USER_KEY).unwrap()).unwrap();
        assert_eq!(stored, User::new("user_1", "student"));
    }

    #[test]
    fn test_login_round_trips_through_reload() {
        let (storage, sessions) = store_with(&[]);
        sessions.login("tok", User::new("user_1", "teacher")).unwrap();

        let reloaded = SessionStore::load(Arc::new(storage));
        assert_eq!(reloaded.snapshot(), sessions.snapshot());
    }

    #[test]
    fn test_login_write_failure_leaves_session_unchanged() {
        let (storage, sessions) = store_with(&[]);
        storage.set_write_should_fail(true);

        let err = sessions.login("tok", User::new("user_1", "student")).unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_failed_login_never_mixes_token_and_previous_user() {
        let (storage, sessions) = store_with(&[]);
        sessions.login("teacher-tok", User::new("user_1", "teacher")).unwrap();

        storage.set_write_should_fail_for(Some(USER_KEY));
        let err = sessions.login("student-tok", User::new("user_2", "student")).unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
        assert!(!sessions.is_authenticated());

        let reloaded = SessionStore::load(Arc::new(storage.clone())).snapshot();
        assert_eq!(reloaded, Session::anonymous());
        assert_eq!(storage.peek(TOKEN_KEY), None);
    }

    #[test]
    fn test_failed_token_write_after_user_write_is_signed_out() {
        let (storage, sessions) = store_with(&[]);
        sessions.login("teacher-tok", User::new("user_1", "teacher")).unwrap();

        storage.set_write_should_fail_for(Some(TOKEN_KEY));
        assert!(sessions.login("student-tok", User::new("user_2", "student")).is_err());

        let reloaded = SessionStore::load(Arc::new(storage)).snapshot();
        assert_eq!(reloaded, Session::anonymous());
        assert_eq!(sessions.snapshot(), reloaded);
    }

    #[test]
    fn test_clones_share_state() {
        let (_, sessions) = store_with(&[]);
        let other = sessions.clone();

        sessions.login("tok", User::new("user_1", "student")).unwrap();
        assert_eq!(other.token(), Some("tok".to_string()));

        other.logout().unwrap();
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_logout_removes_keys() {
        let (storage, sessions) = store_with(&[]);
        sessions.login("tok", User::new("user_1", "student")).unwrap();

        sessions.logout().unwrap();

        assert_eq!(sessions.snapshot(), Session::anonymous());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_logout_clears_memory_even_if_storage_fails() {
        let (storage, sessions) = store_with(&[]);
        sessions.login("tok", User::new("user_1", "student")).unwrap();
        storage.set_write_should_fail(true);

        assert!(sessions.logout().is_err());
        assert!(!sessions.is_authenticated());
    }

    #[test]
    fn test_update_user_keeps_token() {
        let (storage, sessions) = store_with(&[]);
        sessions.login("tok", User::new("user_1", "student")).unwrap();

        sessions.update_user(User::new("user_1", "teacher")).unwrap();

        let session = sessions.snapshot();
        assert_eq!(session.token(), Some("tok"));
        assert_eq!(session.role(), Some("teacher"));
        assert!(storage.peek(USER_KEY).unwrap().contains("teacher"));
    }

    #[test]
    fn test_update_user_requires_session() {
        let (_, sessions) = store_with(&[]);
        let err = sessions.update_user(User::new("user_1", "teacher")).unwrap_err();
        assert!(matches!(err, SessionError::NotAuthenticated));
    }

    #[test]
    fn test_debug_hides_token() {
        let (_, sessions) = store_with(&[(TOKEN_KEY, "secret-token")]);
        let text = format!("{:?}", sessions);
        assert!(!text.contains("secret-token"));
        assert!(text.contains("authenticated: true"));
    }
}
