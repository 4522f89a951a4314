//! Sign-in, registration and role updates.
//!
//! These wrap the `/auth` endpoints and keep the [`SessionStore`] in step
//! with what the server returned.
//!
//! [`SessionStore`]: crate::session::SessionStore

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use super::{ApiGateway, RequestOptions};
use crate::error::GatewayError;
use crate::session::User;

/// Payload of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// New account details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl ApiGateway {
    /// Sign in and persist the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, GatewayError> {
        let body = json!({ "email": email, "password": password });
        let data = self
            .request("/auth/login", RequestOptions::post().json(body))
            .await?;
        self.establish_session(data)
    }

    /// Create an account and sign in as it.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, GatewayError> {
        let body = json!({
            "name": request.name,
            "email": request.email,
            "password": request.password,
            "role": request.role,
        });
        let data = self
            .request("/auth/register", RequestOptions::post().json(body))
            .await?;
        self.establish_session(data)
    }

    /// Change the signed-in user's role and store the updated record.
    pub async fn update_my_role(&self, role: &str) -> Result<User, GatewayError> {
        let user: User = self
            .request_json(
                "/auth/me/role",
                RequestOptions::patch().json(json!({ "role": role })),
            )
            .await?;
        self.session.update_user(user.clone())?;
        info!(user_id = %user.id, role = %user.role, "Role updated");
        Ok(user)
    }

    /// Forget the local session. No request is sent.
    pub fn logout(&self) -> Result<(), GatewayError> {
        self.session.logout()?;
        Ok(())
    }

    fn establish_session(&self, data: Value) -> Result<User, GatewayError> {
        let auth: AuthResponse =
            serde_json::from_value(data).map_err(|e| GatewayError::InvalidResponse {
                message: format!("malformed auth response: {}", e),
            })?;
        self.session.login(auth.token, auth.user.clone())?;
        Ok(auth.user)
    }
}
