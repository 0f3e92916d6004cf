//! API server configuration.

use std::time::Duration;

use authgate_core::auth::{AllowList, SigningSecret};
use url::Url;

/// Configuration for the API server, built once at startup.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8000").
    pub bind_addr: String,
    /// Base URL of the users API.
    pub users_api_address: Url,
    /// Timeout for a single users API call.
    pub users_api_timeout: Duration,
    /// JWT signing secret.
    pub signing_secret: SigningSecret,
    /// Fast-reject set of known credential pairs.
    pub allow_list: AllowList,
}
