//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
///
/// Carries enough identity for API handlers to work without a database
/// lookup on the hot path.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    /// Internal user id
    pub sub: String,
    pub email: String,
    pub name: String,
    /// Issued-at (Unix timestamp, seconds)
    pub iat: usize,
    /// Expiry (Unix timestamp, seconds); always iat + the fixed lifetime
    pub exp: usize,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub created_at: String,
    pub last_login: String,
}

/// Identity profile handed back by the OAuth provider after a successful
/// handshake; only the external id is guaranteed to be present
#[derive(Debug, Clone)]
pub struct ExternalProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}
