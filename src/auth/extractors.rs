//! Authentication extractors for Axum
//!
//! Two separate capabilities guard the API surface: `AuthedUser` validates
//! bearer tokens cryptographically with no database access, `SessionUser`
//! validates the cookie session against the server-side store and the users
//! table. They have different lifetimes and different failure semantics and
//! are deliberately not mixed.

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::models::User;
use super::sessions::SESSION_COOKIE;
use super::tokens::TokenError;
use crate::common::{safe_email_log, ApiError, AppState};

/// Identity attached by the token verification middleware.
///
/// Populated straight from the verified claims; protected handlers never hit
/// the database to establish who is calling.
#[derive(Debug)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        // Extract Bearer token from Authorization header
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        // Only the `Bearer <token>` shape is accepted; a header without the
        // scheme prefix is treated the same as no header at all
        let token = match header.and_then(|value| value.strip_prefix("Bearer ")) {
            Some(token) => token,
            None => {
                warn!("Authentication failed: missing or malformed Authorization header");
                return Err(TokenError::Missing.into());
            }
        };

        let claims = app_state.tokens.verify(token).map_err(|e| {
            warn!(reason = ?e, "Bearer token rejected");
            ApiError::from(e)
        })?;

        debug!(
            user_id = %claims.sub,
            email = %safe_email_log(&claims.email),
            "Bearer token verified"
        );

        Ok(AuthedUser {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Cookie-session-gated identity, used only by the browser navigation
/// endpoints (`/api/user`, `/api/refresh-token`).
///
/// Valid if and only if the cookie names a live session record AND the user
/// that session points at still exists.
#[derive(Debug)]
pub struct SessionUser {
    pub session_id: String,
    pub user: User,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthorized("Not authenticated".to_string()))?;

        let session_id = match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => {
                return Err(ApiError::Unauthorized("Not authenticated".to_string()));
            }
        };

        let session = match app_state.sessions.get(&session_id).await {
            Some(s) => s,
            None => {
                debug!("Session cookie presented but no matching session record");
                return Err(ApiError::Unauthorized("Not authenticated".to_string()));
            }
        };

        let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(&session.user_id)
            .fetch_optional(&app_state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        match user {
            Some(user) => {
                debug!(
                    user_id = %user.id,
                    email = %safe_email_log(&user.email),
                    "Session authentication successful"
                );
                Ok(SessionUser { session_id, user })
            }
            None => {
                warn!(user_id = %session.user_id, "Session names a user that no longer exists");
                Err(ApiError::Unauthorized("Not authenticated".to_string()))
            }
        }
    }
}
