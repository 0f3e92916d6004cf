//! Login flow — credential gate, then token issuance.

use authgate_core::auth::{AuthError, CredentialGate, TokenIssuer};
use authgate_core::models::auth::{Credentials, RequestContext};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::TokenResponse;

/// Authenticate `credentials` and mint a session token.
///
/// Internal failures are logged here with full detail; the caller only ever
/// sees the generic message.
pub async fn login(
    gate: &CredentialGate,
    issuer: &TokenIssuer,
    credentials: &Credentials,
    ctx: &RequestContext,
) -> AppResult<TokenResponse> {
    let user = match gate.authenticate(credentials, ctx).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => return Err(AppError::InvalidCredentials),
        Err(e) => {
            error!(username = %credentials.username, error = %e, "could not authorize user");
            return Err(AppError::from(e));
        }
    };

    let access_token = issuer.issue(&user).map_err(|e| {
        error!(username = %user.username, error = %e, "could not generate a JWT token");
        AppError::from(e)
    })?;

    info!(username = %user.username, role = %user.role, "issued session token");

    Ok(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: issuer.expires_in(),
    })
}
