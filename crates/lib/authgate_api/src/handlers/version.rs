//! Service identity endpoint.

/// `GET /version` — plain-text service banner.
pub async fn version_handler() -> String {
    format!("Auth API, written in Rust v{}\n", authgate_core::version())
}
