//! Remote user directory — the authoritative source of user records.

pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::{Credentials, RequestContext, UserRecord};

pub use http::HttpUserDirectory;

/// Errors returned by a user directory lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The directory rejected the credentials.
    #[error("Wrong credentials")]
    WrongCredentials,

    #[error("Users API timed out")]
    Timeout,

    #[error("Users API request failed: {0}")]
    Transport(String),

    #[error("Users API returned {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Users API response could not be decoded: {0}")]
    Decode(String),
}

/// Lookup of a user record for a credential pair.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether a successful lookup proves the password is correct.
    ///
    /// Directories that only resolve usernames must return `false`; they can
    /// only sit behind an enabled allow-list.
    fn verifies_password(&self) -> bool;

    async fn lookup_user(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext,
    ) -> Result<UserRecord, LookupError>;
}
