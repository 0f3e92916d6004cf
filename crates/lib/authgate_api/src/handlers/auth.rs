//! Authentication request handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use authgate_core::models::auth::{Credentials, RequestContext};
use authgate_core::users::http::REQUEST_ID_HEADER;
use tracing::error;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, TokenResponse};
use crate::services::auth;

/// `POST /login` — authenticate with username + password.
///
/// The body is decoded as JSON whatever the content type. Missing fields are
/// empty and end up as invalid credentials; only undecodable JSON is treated
/// as an internal failure.
pub async fn login_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<TokenResponse>> {
    let credentials: Credentials = serde_json::from_slice::<LoginRequest>(&body)
        .map_err(|e| {
            error!(error = %e, "could not read credentials from POST body");
            AppError::Internal(e.to_string())
        })?
        .into();

    let ctx = request_context(&headers);
    let resp = auth::login(&state.gate, &state.issuer, &credentials, &ctx).await?;
    Ok(Json(resp))
}

fn request_context(headers: &HeaderMap) -> RequestContext {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestContext::with_request_id)
        .unwrap_or_default()
}
