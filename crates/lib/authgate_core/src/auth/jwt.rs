//! JWT token generation and verification.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::AuthError;
use crate::models::auth::{ServiceClaims, TokenClaims, UserRecord};

/// Session token lifetime: 72 hours.
pub const TOKEN_VALIDITY_SECS: i64 = 72 * 60 * 60;

/// Service token lifetime for users API lookups: 1 minute.
const SERVICE_TOKEN_VALIDITY_SECS: i64 = 60;

/// Symmetric HMAC key used to sign every issued token.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wrap a secret. Rejects an empty key.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::Internal("signing secret is empty".into()));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(**redacted**)")
    }
}

/// Signs session tokens (HS256, 72 h expiry) and verifies them.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity: Duration::seconds(TOKEN_VALIDITY_SECS),
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in(&self) -> i64 {
        self.validity.num_seconds()
    }

    /// Issue a signed token for `user`, expiring 72 h from now.
    pub fn issue(&self, user: &UserRecord) -> Result<String, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a signed token for `user` as if issued at `issued_at`.
    pub fn issue_at(&self, user: &UserRecord, issued_at: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = TokenClaims::for_user(user, (issued_at + self.validity).timestamp());
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify a session token, returning its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<TokenClaims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("validity_secs", &self.validity.num_seconds())
            .finish_non_exhaustive()
    }
}

/// Generate the read-scoped bearer token presented to the users API.
pub fn generate_service_token(username: &str, secret: &SigningSecret) -> Result<String, AuthError> {
    let claims = ServiceClaims {
        username: username.to_string(),
        scope: "read".to_string(),
        exp: (Utc::now() + Duration::seconds(SERVICE_TOKEN_VALIDITY_SECS)).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Internal(format!("service token encode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SigningSecret {
        SigningSecret::new(s).unwrap()
    }

    fn admin() -> UserRecord {
        UserRecord {
            username: "admin".into(),
            firstname: "Ada".into(),
            lastname: "Min".into(),
            role: "superuser".into(),
        }
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(SigningSecret::new(""), Err(AuthError::Internal(_))));
    }

    #[test]
    fn secret_debug_is_redacted() {
        assert_eq!(format!("{:?}", secret("topsecret")), "SigningSecret(**redacted**)");
    }

    #[test]
    fn issued_claims_match_user() {
        let issuer = TokenIssuer::new(&secret("test-secret"));
        let before = Utc::now().timestamp();
        let token = issuer.issue(&admin()).unwrap();
        let after = Utc::now().timestamp();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.firstname, "Ada");
        assert_eq!(claims.lastname, "Min");
        assert_eq!(claims.role, "superuser");
        assert!(claims.exp >= before + TOKEN_VALIDITY_SECS);
        assert!(claims.exp <= after + TOKEN_VALIDITY_SECS);
        assert!(claims.exp > after);
    }

    #[test]
    fn tokens_issued_at_different_times_differ() {
        let issuer = TokenIssuer::new(&secret("test-secret"));
        let now = Utc::now();
        let first = issuer.issue_at(&admin(), now).unwrap();
        let second = issuer.issue_at(&admin(), now + Duration::seconds(5)).unwrap();
        assert_ne!(first, second);

        let a = issuer.verify(&first).unwrap();
        let b = issuer.verify(&second).unwrap();
        assert_eq!(b.exp - a.exp, 5);
    }

    #[test]
    fn foreign_secret_fails_verification() {
        let ours = TokenIssuer::new(&secret("our-secret"));
        let theirs = TokenIssuer::new(&secret("their-secret"));
        let token = theirs.issue(&admin()).unwrap();
        assert!(matches!(ours.verify(&token), Err(AuthError::TokenError(_))));
    }

    #[test]
    fn expired_token_fails_verification() {
        let issuer = TokenIssuer::new(&secret("test-secret"));
        let long_ago = Utc::now() - Duration::days(10);
        let token = issuer.issue_at(&admin(), long_ago).unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn service_token_carries_read_scope() {
        let s = secret("test-secret");
        let token = generate_service_token("johnd", &s).unwrap();
        let data = decode::<ServiceClaims>(
            &token,
            &DecodingKey::from_secret(s.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(data.claims.username, "johnd");
        assert_eq!(data.claims.scope, "read");
    }
}
