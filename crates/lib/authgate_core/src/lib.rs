//! # authgate_core
//!
//! Core domain logic for Authgate: credential checks, token issuance and the
//! client for the remote user directory.

pub mod auth;
pub mod config;
pub mod models;
pub mod users;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
