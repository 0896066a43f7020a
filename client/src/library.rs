//! Audiobook library operations, all routed through the auth-wrapped
//! request primitive.

use reqwest::multipart::{Form, Part};

use crate::auth::AuthClient;
use crate::error::ClientError;
use crate::models::{Audiobook, DownloadInfo};

impl AuthClient {
    /// GET /api/audiobooks - fetch and cache the caller's library
    pub async fn fetch_audiobooks(&self) -> Result<Vec<Audiobook>, ClientError> {
        let url = self.url("/api/audiobooks");
        let response = self.authenticated_request(|http| http.get(&url)).await?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        let books: Vec<Audiobook> = response.json().await?;
        self.cache_audiobooks(books.clone()).await;
        Ok(books)
    }

    /// POST /api/audiobooks - store generated audio under a title
    pub async fn store_audiobook(
        &self,
        audio: Vec<u8>,
        title: &str,
        original_file_name: &str,
    ) -> Result<Audiobook, ClientError> {
        let response = self
            .authenticated_form_request("/api/audiobooks", || {
                Form::new()
                    .part(
                        "audioFile",
                        Part::bytes(audio.clone()).file_name("audiobook.wav"),
                    )
                    .text("title", title.to_string())
                    .text("originalFileName", original_file_name.to_string())
            })
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        let book: Audiobook = response.json().await?;
        self.cache_insert_front(book.clone()).await;
        Ok(book)
    }

    /// DELETE /api/audiobooks/:id
    pub async fn delete_audiobook(&self, file_id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/audiobooks/{}", file_id));
        let response = self.authenticated_request(|http| http.delete(&url)).await?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        self.cache_remove(file_id).await;
        Ok(())
    }

    /// GET /api/audiobooks/:id/download
    pub async fn get_download_url(&self, file_id: &str) -> Result<DownloadInfo, ClientError> {
        let url = self.url(&format!("/api/audiobooks/{}/download", file_id));
        let response = self.authenticated_request(|http| http.get(&url)).await?;

        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}
