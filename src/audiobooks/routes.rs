//! Audiobook routes

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};

use super::handlers;

/// Uploads are capped at 50 MB
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Creates and returns the audiobook router (all routes bearer-token-gated)
///
/// # Routes
/// - `GET /api/audiobooks` - List the caller's audiobooks
/// - `POST /api/audiobooks` - Store a generated audiobook (multipart)
/// - `DELETE /api/audiobooks/:id` - Delete by file id
/// - `GET /api/audiobooks/:id/download` - Temporary download URL
pub fn audiobook_routes() -> Router {
    Router::new()
        .route(
            "/api/audiobooks",
            get(handlers::list_audiobooks).post(handlers::create_audiobook),
        )
        .route("/api/audiobooks/:id", delete(handlers::delete_audiobook))
        .route(
            "/api/audiobooks/:id/download",
            get(handlers::download_audiobook),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
