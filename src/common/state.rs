// Application state shared across all modules
//
// Built once at startup and handed to the router as an Extension; the session
// store and signing secret live here rather than in ambient globals so the
// auth core stays independently testable.

use reqwest::Client;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::sessions::SessionStore;
use crate::auth::tokens::TokenIssuer;
use crate::services::{GoogleService, StorageService};

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub http: Client,
    /// Signs and verifies bearer tokens
    pub tokens: TokenIssuer,
    /// Origin of the single-page application; OAuth flows redirect here
    pub client_url: String,
    pub sessions: SessionStore,
    pub storage: Arc<StorageService>,
    pub google: Arc<GoogleService>,
}
