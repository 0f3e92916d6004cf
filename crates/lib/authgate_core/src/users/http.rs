//! HTTP client for the users API.
//!
//! `GET {base}/users/{username}` with a read-scoped bearer token signed with
//! the shared secret. The password is not sent; the allow-list pre-check is
//! what ties it to the username.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;
use url::Url;

use super::{LookupError, UserDirectory};
use crate::auth::jwt::{SigningSecret, generate_service_token};
use crate::models::auth::{Credentials, RequestContext, UserRecord};

/// Header carrying the request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Default timeout for a single users API call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum error body size kept for diagnostics.
pub const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// [`UserDirectory`] backed by the remote users API.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
    secret: SigningSecret,
}

impl HttpUserDirectory {
    /// Build a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: Url, secret: SigningSecret, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(format!("client build: {e}")))?;
        Ok(Self {
            client,
            base_url,
            secret,
        })
    }

    fn user_url(&self, username: &str) -> Result<Url, LookupError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::Transport(format!("invalid users API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .push("users")
            .push(username);
        Ok(url)
    }
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error response body.
async fn read_error_body(mut resp: Response) -> String {
    let mut buf = Vec::new();
    let mut truncated = false;
    loop {
        match resp.chunk().await {
            Ok(Some(chunk)) => {
                buf.extend_from_slice(&chunk);
                if buf.len() > MAX_ERROR_BODY_BYTES {
                    truncated = true;
                    break;
                }
            }
            Ok(None) => break,
            Err(_) => {
                truncated = true;
                break;
            }
        }
    }
    buf.truncate(MAX_ERROR_BODY_BYTES);
    let mut body = String::from_utf8_lossy(&buf).into_owned();
    if truncated {
        body.push_str("...[truncated]");
    }
    body
}

fn classify(e: reqwest::Error) -> LookupError {
    if e.is_timeout() {
        LookupError::Timeout
    } else {
        LookupError::Transport(e.to_string())
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    /// The users API resolves usernames only.
    fn verifies_password(&self) -> bool {
        false
    }

    async fn lookup_user(
        &self,
        credentials: &Credentials,
        ctx: &RequestContext,
    ) -> Result<UserRecord, LookupError> {
        let url = self.user_url(&credentials.username)?;
        let token = generate_service_token(&credentials.username, &self.secret)
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let mut request = self.client.get(url.clone()).bearer_auth(token);
        if let Some(request_id) = &ctx.request_id {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }

        debug!(%url, "looking up user");
        let resp = request.send().await.map_err(classify)?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                return Err(LookupError::WrongCredentials);
            }
            status => {
                return Err(LookupError::UnexpectedStatus {
                    status: status.as_u16(),
                    body: read_error_body(resp).await,
                });
            }
        }

        let bytes = resp.bytes().await.map_err(classify)?;
        let user: UserRecord =
            serde_json::from_slice(&bytes).map_err(|e| LookupError::Decode(e.to_string()))?;

        if user.username != credentials.username {
            return Err(LookupError::Decode(format!(
                "requested user '{}' but got '{}'",
                credentials.username, user.username
            )));
        }

        Ok(user)
    }
}
