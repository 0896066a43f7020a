//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/google` - Start the OAuth redirect flow
/// - `GET /auth/google/callback` - Provider redirect target
/// - `GET /auth/logout` - Destroy the session and clear the cookie
/// - `GET /api/user` - Current user + fresh bearer token (cookie-gated)
/// - `POST /api/refresh-token` - Fresh bearer token (cookie-gated)
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/google", get(handlers::google_oauth_start))
        .route("/auth/google/callback", get(handlers::google_oauth_callback))
        .route("/auth/logout", get(handlers::logout_handler))
        .route("/api/user", get(handlers::current_user))
        .route("/api/refresh-token", post(handlers::refresh_token_handler))
}
