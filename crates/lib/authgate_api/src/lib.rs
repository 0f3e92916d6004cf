//! # authgate_api
//!
//! HTTP API library for Authgate.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use authgate_core::auth::{AuthError, CredentialGate, TokenIssuer};
use authgate_core::users::{HttpUserDirectory, LookupError, UserDirectory};
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::handlers::{auth, version};

pub const ROUTE_LOGIN: &str = "/login";
pub const ROUTE_VERSION: &str = "/version";

/// Errors building [`AppState`] at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Directory(#[from] LookupError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Shared application state passed to all handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<CredentialGate>,
    pub issuer: Arc<TokenIssuer>,
}

impl AppState {
    /// Build state backed by the remote users API described in `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, StateError> {
        let directory = HttpUserDirectory::new(
            config.users_api_address.clone(),
            config.signing_secret.clone(),
            config.users_api_timeout,
        )?;
        Ok(Self::with_directory(config, Arc::new(directory))?)
    }

    /// Build state with an explicit user directory.
    pub fn with_directory(
        config: &ApiConfig,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, AuthError> {
        info!(
            allow_list_enabled = config.allow_list.is_enabled(),
            allow_list_entries = config.allow_list.entry_count(),
            users_api = %config.users_api_address,
            "building application state"
        );
        Ok(Self {
            gate: Arc::new(CredentialGate::new(config.allow_list.clone(), directory)?),
            issuer: Arc::new(TokenIssuer::new(&config.signing_secret)),
        })
    }
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    error!("request handler panicked");
    AppError::Internal("handler panicked".into()).into_response()
}

/// Builds the Axum router with all routes, middleware and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let request_id = req
            .headers()
            .get(authgate_core::users::http::REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri().path(),
            request_id = %request_id,
        )
    });

    // Layers run outermost-last: request id is set before the trace span opens.
    Router::new()
        .route(ROUTE_VERSION, get(version::version_handler))
        .route(ROUTE_LOGIN, post(auth::login_handler))
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
