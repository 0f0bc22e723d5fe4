//! Login and registration against the remote service.
//!
//! These only produce the success shape the session store consumes.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;
use crate::session::{Credential, Identity};

/// Login form fields.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Registration form fields.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    /// Desired account name.
    pub username: String,
    /// Desired password.
    pub password: String,
    /// Optional contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"***")
            .field("email", &self.email)
            .finish()
    }
}

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Profile returned by the service.
    pub identity: Identity,
    /// Bearer token for generation requests.
    pub credential: Credential,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: Identity,
    token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the login and registration collaborators.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    login_url: Url,
    register_url: Url,
}

impl AuthClient {
    /// Create a client for the given endpoints.
    pub fn new(http: reqwest::Client, login_url: Url, register_url: Url) -> Self {
        Self {
            http,
            login_url,
            register_url,
        }
    }

    /// Exchange credentials for an identity and bearer token.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, AuthError> {
        let (status, body) = self.post(&self.login_url, credentials).await?;
        if !(200..300).contains(&status) {
            return Err(rejection(status, &body, "Login failed"));
        }

        let response: LoginResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::Malformed(e.to_string()))?;
        if response.token.trim().is_empty() {
            return Err(AuthError::Malformed("empty token".to_string()));
        }

        tracing::info!(name: "auth.login.succeeded", user = %response.user.name, "Login succeeded");
        Ok(LoginOutcome {
            identity: response.user,
            credential: Credential::new(response.token),
        })
    }

    /// Create an account.
    pub async fn register(&self, registration: &Registration) -> Result<(), AuthError> {
        let (status, body) = self.post(&self.register_url, registration).await?;
        if !(200..300).contains(&status) {
            return Err(rejection(status, &body, "Registration failed"));
        }
        tracing::info!(name: "auth.register.succeeded", user = %registration.username, "Registration succeeded");
        Ok(())
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &Url, payload: &T) -> Result<(u16, String), AuthError> {
        let response = self
            .http
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;
        Ok((status, body))
    }
}

fn rejection(status: u16, body: &str, fallback: &str) -> AuthError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("{fallback} (HTTP {status})"));
    tracing::warn!(status, message = %message, "Auth request rejected");
    AuthError::Rejected(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_prefers_error_field() {
        let err = rejection(401, r#"{"error":"Invalid username or password"}"#, "Login failed");
        assert_eq!(err, AuthError::Rejected("Invalid username or password".into()));
    }

    #[test]
    fn test_rejection_falls_back_to_status() {
        let err = rejection(502, "<html>", "Login failed");
        assert_eq!(err, AuthError::Rejected("Login failed (HTTP 502)".into()));
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = LoginCredentials {
            username: "ada".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
