//! Authentication domain models.
//!
//! These are internal domain models, distinct from the API request/response
//! shapes (which use `#[serde(rename_all = "camelCase")]`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Username/password pair presented by a caller. Lives for one request only.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"**redacted**")
            .finish()
    }
}

/// Authoritative user record returned by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub role: String,
}

/// JWT claims embedded in issued session tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub role: String,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl TokenClaims {
    /// Build claims for `user`, expiring at the given unix timestamp.
    pub fn for_user(user: &UserRecord, exp: i64) -> Self {
        Self {
            username: user.username.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            role: user.role.clone(),
            exp,
        }
    }
}

/// Claims of the short-lived token presented to the users API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceClaims {
    pub username: String,
    pub scope: String,
    pub exp: i64,
}

/// Per-request correlation context forwarded to outbound calls.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Value propagated as the `x-request-id` header.
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
        }
    }
}
