//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Message returned for any rejected credential pair.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "username or password is invalid";

/// Message returned for every internal failure; details only go to the logs.
pub const GENERIC_ERROR_MESSAGE: &str = "something went wrong, please try again later";

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level errors with HTTP status mapping.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                INVALID_CREDENTIALS_MESSAGE,
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                GENERIC_ERROR_MESSAGE,
            ),
        };
        let body = Json(ErrorResponse {
            error: error.to_string(),
            message: message.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<authgate_core::auth::AuthError> for AppError {
    fn from(e: authgate_core::auth::AuthError) -> Self {
        match e {
            authgate_core::auth::AuthError::InvalidCredentials => AppError::InvalidCredentials,
            authgate_core::auth::AuthError::TokenError(msg) => AppError::Internal(msg),
            authgate_core::auth::AuthError::Misconfigured(msg) => AppError::Internal(msg),
            authgate_core::auth::AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let resp = AppError::Internal("users API returned 500: db down".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["message"], GENERIC_ERROR_MESSAGE);
        assert!(!json.to_string().contains("db down"));
    }

    #[tokio::test]
    async fn invalid_credentials_is_unauthorized() {
        let resp = AppError::InvalidCredentials.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(resp).await;
        assert_eq!(json["error"], "invalid_credentials");
        assert_eq!(json["message"], INVALID_CREDENTIALS_MESSAGE);
    }
}
