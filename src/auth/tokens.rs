//! Bearer token issuance and verification.
//!
//! Tokens are stateless: validity is established purely by signature and
//! expiry check, no server-side record exists and there is no revocation
//! short of rotating the signing key.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::warn;

use super::models::{Claims, User};
use crate::common::ApiError;

/// Fixed token validity window: 1 hour from issuance
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Why a bearer token was rejected. Expired is kept distinct from Invalid so
/// the client knows to refresh rather than re-login.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    Missing,
    Expired,
    Invalid,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => ApiError::TokenMissing,
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid => ApiError::TokenInvalid,
        }
    }
}

/// Signs and verifies bearer tokens with the server's HMAC secret.
///
/// Issuance is a pure function of the user, the secret and the clock, so the
/// same user can be issued any number of concurrently valid tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Mint a fresh token for an authenticated user
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now as usize,
            exp: (now + TOKEN_LIFETIME_SECS) as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            warn!(error = %e, user_id = %user.id, "JWT encoding error");
            ApiError::InternalServer("jwt error".to_string())
        })
    }

    /// Verify signature and expiry, returning the embedded claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}
