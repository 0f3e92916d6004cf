//! Startup configuration helpers — allow-list parsing and secret resolution.

use thiserror::Error;
use tracing::warn;

use crate::auth::allow_list::AllowList;

/// Development signing secret used when none is configured.
pub const DEV_SIGNING_SECRET: &str = "myfancysecret";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid allow-list entry at position {0}: expected 'username:password'")]
    InvalidAllowListEntry(usize),

    #[error("Invalid users API address '{0}': {1}")]
    InvalidUsersApiAddress(String, String),

    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),
}

/// Parse a comma-separated `username:password` list into an allow-list.
///
/// Each entry splits on its first `:`, so passwords may contain colons but
/// usernames may not. Whitespace around the username is ignored; the password
/// is taken verbatim. Blank entries are skipped.
pub fn parse_allowed_users(raw: &str) -> Result<AllowList, ConfigError> {
    let mut pairs = Vec::new();
    for (idx, entry) in raw.split(',').enumerate() {
        if entry.trim().is_empty() {
            continue;
        }
        match entry.split_once(':') {
            Some((user, pass)) if !user.trim().is_empty() => pairs.push((user.trim(), pass)),
            _ => return Err(ConfigError::InvalidAllowListEntry(idx)),
        }
    }
    Ok(AllowList::from_pairs(pairs))
}

/// Resolve the signing secret, falling back to the development default.
pub fn resolve_signing_secret(configured: Option<&str>) -> String {
    match configured {
        Some(secret) if !secret.is_empty() => secret.to_string(),
        _ => {
            warn!("no JWT secret configured, using the development default");
            DEV_SIGNING_SECRET.to_string()
        }
    }
}
