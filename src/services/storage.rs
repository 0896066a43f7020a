// src/services/storage.rs
//! S3-backed object storage for audiobook files.
//!
//! Audio blobs are addressed by a generated object key; download access is
//! granted through short-lived presigned URLs rather than public objects.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Presigned download URLs stay valid for one hour, matching the bearer
/// token lifetime.
const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage credentials not configured")]
    NotConfigured,

    #[error("S3 operation failed: {0}")]
    S3Error(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket_name: String,
}

impl StorageConfig {
    /// Read storage configuration from the environment; returns None when the
    /// credentials are absent so the service can fail lazily per operation.
    pub fn from_env() -> Option<Self> {
        let access_key_id = std::env::var("AWS_ACCESS_KEY_ID").ok()?;
        let secret_access_key = std::env::var("AWS_SECRET_ACCESS_KEY").ok()?;
        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let bucket_name = std::env::var("AWS_S3_BUCKET_NAME").unwrap_or_default();

        Some(Self {
            access_key_id,
            secret_access_key,
            region,
            bucket_name,
        })
    }
}

#[derive(Debug)]
pub struct StorageService {
    config: Option<StorageConfig>,
}

impl StorageService {
    pub fn new(config: Option<StorageConfig>) -> Self {
        Self { config }
    }

    fn get_config(&self) -> Result<&StorageConfig, StorageError> {
        self.config.as_ref().ok_or(StorageError::NotConfigured)
    }

    /// Initialize S3 client with the configured credentials
    async fn get_s3_client(&self) -> Result<(S3Client, String), StorageError> {
        let config = self.get_config()?;

        if config.bucket_name.is_empty() {
            return Err(StorageError::InvalidConfig(
                "S3 bucket name not configured".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "env",
        );

        let region = Region::new(config.region.clone());

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .load()
            .await;

        let client = S3Client::new(&aws_config);

        Ok((client, config.bucket_name.clone()))
    }

    /// Upload a file to S3 under the given key
    pub async fn upload_file(
        &self,
        file_data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let (client, bucket) = self.get_s3_client().await?;

        let body = ByteStream::from(Bytes::from(file_data));

        client
            .put_object()
            .bucket(&bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to upload file to S3");
                StorageError::S3Error(format!("Upload failed: {}", e))
            })?;

        info!(key = %key, bucket = %bucket, "File uploaded to S3 successfully");
        Ok(())
    }

    /// Delete a single file from S3
    pub async fn delete_file(&self, key: &str) -> Result<(), StorageError> {
        let (client, bucket) = self.get_s3_client().await?;

        client
            .delete_object()
            .bucket(&bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to delete S3 object");
                StorageError::S3Error(format!("Delete failed: {}", e))
            })?;

        info!(key = %key, "File deleted from S3 successfully");
        Ok(())
    }

    /// Generate a temporary presigned GET URL for the given key
    pub async fn presigned_url(&self, key: &str) -> Result<String, StorageError> {
        let (client, bucket) = self.get_s3_client().await?;

        let presigning = PresigningConfig::expires_in(DOWNLOAD_URL_TTL)
            .map_err(|e| StorageError::InvalidConfig(e.to_string()))?;

        let presigned = client
            .get_object()
            .bucket(&bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "Failed to presign S3 object URL");
                StorageError::S3Error(format!("Presign failed: {}", e))
            })?;

        debug!(key = %key, "Generated presigned download URL");
        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_configured() {
        let storage = StorageService::new(None);
        let result = storage.upload_file(vec![1, 2, 3], "k", "audio/wav").await;
        assert!(matches!(result.unwrap_err(), StorageError::NotConfigured));
    }

    #[tokio::test]
    async fn test_missing_bucket_is_invalid_config() {
        let storage = StorageService::new(Some(StorageConfig {
            access_key_id: "key".into(),
            secret_access_key: "secret".into(),
            region: "us-east-1".into(),
            bucket_name: String::new(),
        }));
        let result = storage.presigned_url("k").await;
        assert!(matches!(result.unwrap_err(), StorageError::InvalidConfig(_)));
    }
}
