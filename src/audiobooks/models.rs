//! Audiobook data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audiobook database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Audiobook {
    pub id: String,
    /// Object-store key component; also the public handle used by the
    /// delete/download routes
    pub file_id: String,
    pub title: String,
    pub original_file_name: Option<String>,
    pub user_id: String,
    pub created_at: String,
}

/// Audiobook record enriched with a temporary download URL for playback.
/// The URL is None when presigning failed; the record itself is still listed.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AudiobookWithUrl {
    #[serde(flatten)]
    pub book: Audiobook,
    pub audio_url: Option<String>,
}
