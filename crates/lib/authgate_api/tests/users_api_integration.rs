//! Integration tests against the real HTTP user directory, backed by an
//! in-process users API.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use authgate_api::config::ApiConfig;
use authgate_api::{AppState, StateError, router};
use authgate_core::auth::{AllowList, AuthError, SigningSecret};
use authgate_core::models::auth::UserRecord;
use axum::Router;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower::ServiceExt;
use url::Url;

/// Users API that knows `admin` and counts every lookup.
async fn spawn_users_api() -> (Url, Arc<AtomicU32>) {
    async fn user(State(calls): State<Arc<AtomicU32>>, Path(username): Path<String>) -> Response {
        calls.fetch_add(1, Ordering::SeqCst);
        match username.as_str() {
            "admin" => axum::Json(UserRecord {
                username: "admin".into(),
                firstname: "Ada".into(),
                lastname: "Min".into(),
                role: "superuser".into(),
            })
            .into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        }
    }

    let calls = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route("/users/{username}", get(user))
        .with_state(calls.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (Url::parse(&format!("http://{addr}")).unwrap(), calls)
}

fn config(users_api_address: Url, allow_list: AllowList) -> ApiConfig {
    ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        users_api_address,
        users_api_timeout: Duration::from_secs(2),
        signing_secret: SigningSecret::new("integration-secret").unwrap(),
        allow_list,
    }
}

fn login_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn disabled_allow_list_is_refused_for_users_api() {
    let (base, calls) = spawn_users_api().await;

    let err = AppState::new(&config(base, AllowList::Disabled))
        .err()
        .expect("state must not build without a password check");
    assert!(matches!(err, StateError::Auth(AuthError::Misconfigured(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_password_never_reaches_users_api() {
    let (base, calls) = spawn_users_api().await;
    let state = AppState::new(&config(base, AllowList::from_pairs([("admin", "admin")]))).unwrap();
    let app = router(state);

    let wrong = app
        .clone()
        .oneshot(login_request(r#"{"username":"admin","password":"guess"}"#))
        .await
        .expect("request");
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let right = app
        .oneshot(login_request(r#"{"username":"admin","password":"admin"}"#))
        .await
        .expect("request");
    assert_eq!(right.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
