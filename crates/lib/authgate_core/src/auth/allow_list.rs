//! Static allow-list of known-valid credential pairs.
//!
//! The set is loaded once at startup and is only a fast-reject layer: the user
//! directory stays the authority for every pair that passes it.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Lookup key derived from a `(username, password)` pair.
///
/// SHA-256 over a length-prefixed encoding, so `("a_b", "c")` and
/// `("a", "b_c")` never share a key and no plaintext password is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowListKey([u8; 32]);

impl AllowListKey {
    pub fn derive(username: &str, password: &str) -> Self {
        let mut hasher = Sha256::new();
        for part in [username, password] {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part.as_bytes());
        }
        Self(hasher.finalize().into())
    }
}

/// Fast-reject set of credential pairs.
#[derive(Debug, Clone)]
pub enum AllowList {
    /// Only the listed pairs may proceed to the user directory.
    Enabled(HashSet<AllowListKey>),
    /// Every pair proceeds to the user directory.
    Disabled,
}

impl AllowList {
    /// Build an enabled allow-list from `(username, password)` pairs.
    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: AsRef<str>,
        P: AsRef<str>,
    {
        Self::Enabled(
            pairs
                .into_iter()
                .map(|(u, p)| AllowListKey::derive(u.as_ref(), p.as_ref()))
                .collect(),
        )
    }

    /// Whether the pair may proceed to remote verification.
    pub fn admits(&self, username: &str, password: &str) -> bool {
        match self {
            Self::Enabled(keys) => keys.contains(&AllowListKey::derive(username, password)),
            Self::Disabled => true,
        }
    }

    /// Number of configured pairs (`None` when disabled).
    pub fn entry_count(&self) -> Option<usize> {
        match self {
            Self::Enabled(keys) => Some(keys.len()),
            Self::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}
