//! Authentication handlers

use axum::{
    extract::{Extension, Query},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::SessionUser;
use super::identity::resolve_or_create_user;
use super::sessions::SESSION_COOKIE;
use crate::common::{ApiError, AppState};

/// GET /auth/google
/// Starts the OAuth flow by redirecting the browser to the provider
pub async fn google_oauth_start(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Redirect, ApiError> {
    let state = state_lock.read().await.clone();

    let auth_url = state.google.authorization_url().map_err(|e| {
        error!(error = %e, "Failed to generate Google OAuth URL");
        ApiError::InternalServer("OAuth is not configured".to_string())
    })?;

    info!("🔐 Redirecting browser to Google OAuth");
    Ok(Redirect::to(&auth_url))
}

/// GET /auth/google/callback
/// Provider redirect target. On success establishes a session, sets the
/// httpOnly session cookie and redirects to the client origin; every failure
/// path redirects to the client origin without a cookie — there is no partial
/// session.
pub async fn google_oauth_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let state = state_lock.read().await.clone();
    let home = home_url(&state);

    if let Some(error) = params.get("error") {
        warn!(oauth_error = %error, "Google OAuth returned error, redirecting home");
        return Redirect::to(&home).into_response();
    }

    let code = match params.get("code") {
        Some(code) => code,
        None => {
            warn!("OAuth callback without authorization code, redirecting home");
            return Redirect::to(&home).into_response();
        }
    };

    match establish_session(&state, code).await {
        Ok(session_id) => {
            let cookie = Cookie::build((SESSION_COOKIE, session_id))
                .http_only(true)
                .same_site(SameSite::Strict)
                .path("/")
                .build();

            info!("OAuth callback successful, redirecting to home");
            (jar.add(cookie), Redirect::to(&home)).into_response()
        }
        Err(e) => {
            // Fail closed: no cookie, no session, back to the landing page
            error!(error = %e, "OAuth callback failed, redirecting home without session");
            Redirect::to(&home).into_response()
        }
    }
}

/// Exchange the authorization code, resolve the identity and bind a session
async fn establish_session(state: &AppState, code: &str) -> Result<String, ApiError> {
    let token_response = state
        .google
        .exchange_code(code)
        .await
        .map_err(|e| ApiError::InternalServer(format!("code exchange failed: {}", e)))?;

    let profile = state
        .google
        .fetch_profile(&token_response.access_token)
        .await
        .map_err(|e| ApiError::InternalServer(format!("profile fetch failed: {}", e)))?;

    let user = resolve_or_create_user(&state.db, &profile).await?;

    Ok(state.sessions.create(&user.id).await)
}

/// GET /auth/logout
/// Destroys the session (idempotent), clears the cookie and redirects to the
/// client origin
pub async fn logout_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> Response {
    let state = state_lock.read().await.clone();

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let destroyed = state.sessions.destroy(cookie.value()).await;
        info!(destroyed = destroyed, "User logout");
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    let jar = jar.remove(removal);

    (jar, Redirect::to(&home_url(&state))).into_response()
}

/// GET /api/user
/// Cookie-session-gated. Returns the logged-in user's fields plus a fresh
/// bearer token for cross-origin API calls.
///
/// # Response
/// ```json
/// {
///   "id": "US_...", "email": "...", ..., "apiToken": "<jwt>"
/// }
/// ```
pub async fn current_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    session: SessionUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let api_token = state.tokens.issue(&session.user)?;

    let mut body = serde_json::to_value(&session.user)
        .map_err(|e| ApiError::InternalServer(format!("serialization failed: {}", e)))?;
    body["apiToken"] = serde_json::Value::String(api_token);

    Ok(Json(body))
}

/// POST /api/refresh-token
/// Cookie-session-gated. Mints a fresh bearer token for the session's user;
/// called by the client whenever an API request bounces with 401.
///
/// # Response
/// ```json
/// { "token": "<jwt>" }
/// ```
pub async fn refresh_token_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    session: SessionUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let token = state.tokens.issue(&session.user)?;

    info!(user_id = %session.user.id, "Issued refreshed bearer token");
    Ok(Json(serde_json::json!({ "token": token })))
}

fn home_url(state: &AppState) -> String {
    format!("{}/", state.client_url.trim_end_matches('/'))
}
