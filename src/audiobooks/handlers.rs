// src/audiobooks/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path},
    response::Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{Audiobook, AudiobookWithUrl};
use crate::auth::AuthedUser;
use crate::common::{generate_audiobook_id, generate_file_id, sanitize_title, ApiError, AppState};

/// Where an audiobook's blob lives in the object store; the sanitized title
/// rides along in the key so stored objects stay recognizable in the bucket
fn object_key(file_id: &str, title: &str) -> String {
    format!("audiobooks/{}_{}.wav", file_id, sanitize_title(title))
}

/// GET /api/audiobooks - List the caller's audiobooks, newest first
///
/// Each record carries a temporary presigned download URL; a presigning
/// failure for one record degrades that record's URL to null rather than
/// failing the whole listing.
pub async fn list_audiobooks(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<AudiobookWithUrl>>, ApiError> {
    let state = state_lock.read().await.clone();

    let books: Vec<Audiobook> = sqlx::query_as::<_, Audiobook>(
        "SELECT * FROM audiobooks WHERE user_id = ? ORDER BY created_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut with_urls = Vec::with_capacity(books.len());
    for book in books {
        let audio_url = match state
            .storage
            .presigned_url(&object_key(&book.file_id, &book.title))
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(
                    error = %e,
                    file_id = %book.file_id,
                    "Failed to presign download URL for audiobook"
                );
                None
            }
        };
        with_urls.push(AudiobookWithUrl { book, audio_url });
    }

    Ok(Json(with_urls))
}

/// POST /api/audiobooks - Store a generated audiobook
///
/// Multipart fields: `audioFile` (binary), `title` (required),
/// `originalFileName` (optional). Uploads the blob to object storage, then
/// records the metadata row.
pub async fn create_audiobook(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let mut audio_data: Option<Vec<u8>> = None;
    let mut title: Option<String> = None;
    let mut original_file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart body".to_string()))?
    {
        match field.name() {
            Some("audioFile") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;
                audio_data = Some(data.to_vec());
            }
            Some("title") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid title field".to_string()))?;
                title = Some(value);
            }
            Some("originalFileName") => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::BadRequest("Invalid file name field".to_string()))?;
                original_file_name = Some(value);
            }
            _ => {}
        }
    }

    let audio_data =
        audio_data.ok_or_else(|| ApiError::BadRequest("No audio file provided".to_string()))?;
    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    // Sniff the payload; reject anything that is recognizably not audio
    let content_type = match infer::get(&audio_data) {
        Some(kind) if kind.mime_type().starts_with("audio/") => kind.mime_type().to_string(),
        Some(kind) => {
            warn!(
                user_id = %authed.id,
                detected = %kind.mime_type(),
                "Rejected audiobook upload with non-audio payload"
            );
            return Err(ApiError::BadRequest(
                "Uploaded file is not audio".to_string(),
            ));
        }
        None => "audio/wav".to_string(),
    };

    let file_id = generate_file_id();
    let key = object_key(&file_id, &title);

    info!(
        user_id = %authed.id,
        file_id = %file_id,
        size = audio_data.len(),
        "Storing audiobook"
    );

    state
        .storage
        .upload_file(audio_data, &key, &content_type)
        .await
        .map_err(|e| ApiError::StorageError(e.to_string()))?;

    let id = generate_audiobook_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO audiobooks (id, file_id, title, original_file_name, user_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&file_id)
    .bind(&title)
    .bind(original_file_name.as_deref())
    .bind(&authed.id)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let audio_url = state
        .storage
        .presigned_url(&key)
        .await
        .map_err(|e| ApiError::StorageError(e.to_string()))?;

    info!(user_id = %authed.id, audiobook_id = %id, "Audiobook stored successfully");

    Ok(Json(json!({
        "id": id,
        "fileId": file_id,
        "title": title,
        "originalFileName": original_file_name,
        "userId": authed.id,
        "createdAt": now,
        "audioUrl": audio_url,
    })))
}

/// DELETE /api/audiobooks/:id - Delete an audiobook by file id
///
/// A storage delete failure is logged and the database row is still removed,
/// so the library never shows a book whose blob outlived it.
pub async fn delete_audiobook(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(file_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let book: Option<Audiobook> = sqlx::query_as::<_, Audiobook>(
        "SELECT * FROM audiobooks WHERE file_id = ? AND user_id = ?",
    )
    .bind(&file_id)
    .bind(&authed.id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let book = book.ok_or_else(|| ApiError::NotFound("Audiobook not found".to_string()))?;

    if let Err(e) = state
        .storage
        .delete_file(&object_key(&book.file_id, &book.title))
        .await
    {
        error!(
            error = %e,
            file_id = %book.file_id,
            "Error deleting audiobook from storage, removing database record anyway"
        );
    }

    sqlx::query("DELETE FROM audiobooks WHERE id = ?")
        .bind(&book.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, audiobook_id = %book.id, "Audiobook deleted");

    Ok(Json(json!({ "message": "Audiobook deleted successfully" })))
}

/// GET /api/audiobooks/:id/download - Temporary download URL for one book
pub async fn download_audiobook(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(file_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let book: Option<Audiobook> = sqlx::query_as::<_, Audiobook>(
        "SELECT * FROM audiobooks WHERE file_id = ? AND user_id = ?",
    )
    .bind(&file_id)
    .bind(&authed.id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let book = book.ok_or_else(|| ApiError::NotFound("Audiobook not found".to_string()))?;

    let file_name = format!("{}_audiobook.wav", sanitize_title(&book.title));
    let download_url = state
        .storage
        .presigned_url(&object_key(&book.file_id, &book.title))
        .await
        .map_err(|e| ApiError::StorageError(e.to_string()))?;

    Ok(Json(json!({
        "downloadUrl": download_url,
        "fileName": file_name,
    })))
}
