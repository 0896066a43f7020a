// src/services/google.rs
//! Google OAuth adapter: authorization URL, code exchange and profile fetch.
//!
//! The identity provider is an external collaborator; this service only speaks
//! its wire protocol and hands back an [`ExternalProfile`] for the identity
//! bridge to resolve.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::auth::models::ExternalProfile;

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Google OAuth not configured")]
    NotConfigured,

    #[error("OAuth flow failed: {0}")]
    OAuthFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered with the provider; must match on both the
    /// authorization and the token-exchange legs.
    pub callback_url: String,
}

impl GoogleConfig {
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var("GOOGLE_CLIENT_ID").ok()?;
        let client_secret = std::env::var("GOOGLE_CLIENT_SECRET").ok()?;
        let callback_url = std::env::var("GOOGLE_CALLBACK_URL")
            .unwrap_or_else(|_| "http://localhost:8080/auth/google/callback".to_string());

        Some(Self {
            client_id,
            client_secret,
            callback_url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
}

/// Shape of Google's userinfo endpoint response
#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    id: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug)]
pub struct GoogleService {
    config: Option<GoogleConfig>,
    client: Client,
}

impl GoogleService {
    pub fn new(config: Option<GoogleConfig>, client: Client) -> Self {
        Self { config, client }
    }

    fn get_config(&self) -> Result<&GoogleConfig, GoogleError> {
        self.config.as_ref().ok_or(GoogleError::NotConfigured)
    }

    /// Build the authorization URL the browser is redirected to
    pub fn authorization_url(&self) -> Result<String, GoogleError> {
        let config = self.get_config()?;

        let scope_param = "openid email profile";

        let auth_url = format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}",
            urlencoding::encode(&config.client_id),
            urlencoding::encode(&config.callback_url),
            urlencoding::encode(scope_param)
        );

        debug!("Generated Google OAuth authorization URL");
        Ok(auth_url)
    }

    /// Exchange an authorization code for tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, GoogleError> {
        let config = self.get_config()?;

        let params = [
            ("code", code),
            ("client_id", &config.client_id),
            ("client_secret", &config.client_secret),
            ("redirect_uri", &config.callback_url),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post("https://oauth2.googleapis.com/token")
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(GoogleError::OAuthFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))
    }

    /// Fetch the authenticated user's profile with the freshly obtained
    /// access token
    pub async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, GoogleError> {
        let response = self
            .client
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| GoogleError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            error!(status = %status, "Userinfo request rejected");
            return Err(GoogleError::OAuthFailed(format!(
                "userinfo returned HTTP {}",
                status
            )));
        }

        let info = response
            .json::<UserInfoResponse>()
            .await
            .map_err(|e| GoogleError::SerializationError(e.to_string()))?;

        Ok(ExternalProfile {
            id: info.id,
            email: info.email,
            name: info.name,
            picture: info.picture,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_contains_client_and_callback() {
        let service = GoogleService::new(
            Some(GoogleConfig {
                client_id: "cid-123".into(),
                client_secret: "secret".into(),
                callback_url: "http://localhost:8080/auth/google/callback".into(),
            }),
            Client::new(),
        );

        let url = service.authorization_url().unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=cid-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains(&urlencoding::encode("http://localhost:8080/auth/google/callback").to_string()));
    }

    #[test]
    fn test_not_configured() {
        let service = GoogleService::new(None, Client::new());
        assert!(matches!(
            service.authorization_url().unwrap_err(),
            GoogleError::NotConfigured
        ));
    }
}
