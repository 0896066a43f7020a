//! Server-side session records backing the `authToken` cookie.
//!
//! A session binds a random browser-held identifier to a user id. Records are
//! ephemeral and in-memory: a restart logs everyone out of the cookie flow,
//! which only costs one OAuth round trip.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Name of the httpOnly session cookie
pub const SESSION_COOKIE: &str = "authToken";

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Shared in-memory session store
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new session to the given user, returning the session id for
    /// the cookie
    pub async fn create(&self, user_id: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session {
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        self.inner.write().await.insert(id.clone(), session);
        id
    }

    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.inner.read().await.get(session_id).cloned()
    }

    /// Destroy a session. Idempotent: destroying an unknown or already
    /// destroyed session is not an error.
    pub async fn destroy(&self, session_id: &str) -> bool {
        self.inner.write().await.remove(session_id).is_some()
    }
}
