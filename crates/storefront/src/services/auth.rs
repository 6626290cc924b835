//! Login against the backend auth endpoint.
//!
//! A successful login installs the returned token on the shared API client
//! so every subsequent request carries the bearer header. Durable session
//! persistence belongs to the embedding application.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::api::{ApiClient, ApiError};

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Backend call failed (bad credentials surface as an API status error).
    #[error("auth backend error: {0}")]
    Api(#[from] ApiError),

    /// Login reported success but carried no token.
    #[error("login succeeded but no token was returned")]
    TokenMissing,
}

/// The authenticated user record returned alongside the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session: the bearer token plus the user record.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct AuthSession {
    token: SecretString,
    pub user: Option<UserProfile>,
}

impl AuthSession {
    /// The bearer token for this session.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Client for the backend login endpoint.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    /// Create an auth service over the backend API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Log in with email and password.
    ///
    /// On success the token is installed on the API client, so catalog,
    /// recommendation, and checkout calls are authenticated from then on.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenMissing` when the backend reports success
    /// without a token, or `AuthError::Api` for any backend failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            #[serde(default)]
            token: Option<String>,
            #[serde(default)]
            user: Option<UserProfile>,
        }

        let response: LoginResponse = self
            .api
            .post_json("auth/login/", &LoginRequest { email, password })
            .await?;

        let token = response
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or(AuthError::TokenMissing)?;
        let token = SecretString::from(token);

        self.api.set_auth_token(token.clone());
        tracing::info!("Login succeeded; bearer token installed");

        Ok(AuthSession {
            token,
            user: response.user,
        })
    }

    /// Drop the installed token; subsequent requests are anonymous.
    pub fn logout(&self) {
        self.api.clear_auth_token();
        tracing::info!("Bearer token cleared");
    }
}
