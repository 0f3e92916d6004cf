//! Authentication logic.
//!
//! Provides the allow-list pre-check, the credential gate that consults the
//! user directory, and JWT issuance shared by `authgate_api`.

pub mod allow_list;
pub mod gate;
pub mod jwt;

use thiserror::Error;

pub use allow_list::{AllowList, AllowListKey};
pub use gate::CredentialGate;
pub use jwt::{SigningSecret, TokenIssuer};

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Misconfigured: {0}")]
    Misconfigured(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
