//! Credential gate — allow-list pre-check followed by the user directory lookup.

use std::sync::Arc;

use tracing::debug;

use super::AuthError;
use super::allow_list::AllowList;
use crate::models::auth::{Credentials, RequestContext, UserRecord};
use crate::users::{LookupError, UserDirectory};

/// Decides whether a credential pair belongs to a real user.
///
/// Pairs missing from the allow-list are rejected without a remote call.
/// Everything else is settled by exactly one directory lookup, no retries.
pub struct CredentialGate {
    allow_list: AllowList,
    directory: Arc<dyn UserDirectory>,
}

impl CredentialGate {
    /// Build a gate. A disabled allow-list needs a directory that checks
    /// passwords itself, otherwise any password would pass.
    pub fn new(
        allow_list: AllowList,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, AuthError> {
        if !allow_list.is_enabled() && !directory.verifies_password() {
            return Err(AuthError::Misconfigured(
                "allow-list cannot be disabled: the user directory does not verify passwords"
                    .into(),
            ));
        }
        Ok(Self {
            allow_list,
            directory,
        })
    }

    /// Authenticate `credentials`, returning the directory's user record.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext,
    ) -> Result<UserRecord, AuthError> {
        if !self
            .allow_list
            .admits(&credentials.username, &credentials.password)
        {
            debug!(username = %credentials.username, "rejected by allow-list");
            return Err(AuthError::InvalidCredentials);
        }

        match self.directory.lookup_user(credentials, ctx).await {
            Ok(user) => Ok(user),
            Err(LookupError::WrongCredentials) => {
                debug!(username = %credentials.username, "rejected by user directory");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => Err(AuthError::Internal(e.to_string())),
        }
    }
}
