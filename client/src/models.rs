//! Wire models mirroring the backend's JSON shapes

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Audiobook {
    pub id: String,
    pub file_id: String,
    pub title: String,
    pub original_file_name: Option<String>,
    pub user_id: String,
    pub created_at: String,
    /// Temporary presigned URL; absent when the server could not presign
    #[serde(default)]
    pub audio_url: Option<String>,
}

/// Response of `GET /api/user`: the user fields plus an embedded fresh token
#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(rename = "apiToken")]
    pub api_token: Option<String>,
}

/// Response of `POST /api/refresh-token`
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Response of `GET /api/audiobooks/:id/download`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadInfo {
    pub download_url: String,
    pub file_name: String,
}
