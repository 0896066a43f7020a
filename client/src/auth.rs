//! Auth state and the token-refreshing request primitive.

use reqwest::cookie::Jar;
use reqwest::multipart::Form;
use reqwest::{redirect, Client, RequestBuilder, Response, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::{Audiobook, CurrentUserResponse, TokenResponse, User};

/// Multipart calls wait out the external conversion step
const FORM_TIMEOUT: Duration = Duration::from_secs(300);

/// Single source of truth for the auth state held in memory
#[derive(Debug, Default, Clone)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
    pub audiobooks: Vec<Audiobook>,
}

/// Client for the audiobook API carrying both credentials: the session
/// cookie (in the cookie jar, sent automatically) and the current bearer
/// token (attached per request, refreshed on 401).
pub struct AuthClient {
    base_url: String,
    http: Client,
    state: RwLock<AuthState>,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::build(base_url.into(), None)
    }

    /// Construct with an existing session cookie value, e.g. carried over
    /// from a browser login
    pub fn with_session_cookie(
        base_url: impl Into<String>,
        session_cookie: &str,
    ) -> Result<Self, ClientError> {
        Self::build(base_url.into(), Some(session_cookie))
    }

    fn build(base_url: String, session_cookie: Option<&str>) -> Result<Self, ClientError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let jar = Arc::new(Jar::default());
        if let Some(value) = session_cookie {
            if let Ok(url) = Url::parse(&base_url) {
                jar.add_cookie_str(&format!("authToken={}", value), &url);
            }
        }

        // Redirects are not followed: the OAuth/logout endpoints redirect to
        // the SPA origin, which is not ours to fetch
        let http = Client::builder()
            .cookie_provider(jar)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url,
            http,
            state: RwLock::new(AuthState {
                loading: true,
                ..AuthState::default()
            }),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Seed a bearer token obtained out of band
    pub async fn set_token(&self, token: impl Into<String>) {
        self.state.write().await.token = Some(token.into());
    }

    /// Rehydrate auth state from the cookie session.
    ///
    /// On 200 stores the user and the embedded api token; any failure leaves
    /// the client logged out. Either way the loading flag ends up false.
    pub async fn check_auth_status(&self) {
        let result = self.http.get(self.url("/api/user")).send().await;

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<CurrentUserResponse>().await {
                    Ok(data) => {
                        let mut state = self.state.write().await;
                        state.token = data.api_token.clone();
                        state.user = Some(data.user);
                        debug!("Auth status check: logged in");
                    }
                    Err(e) => warn!(error = %e, "Auth status response malformed"),
                }
            }
            Ok(response) => {
                debug!(status = %response.status(), "Auth status check: not logged in");
            }
            Err(e) => warn!(error = %e, "Auth check failed"),
        }

        self.state.write().await.loading = false;
    }

    /// Ask the server for a fresh bearer token using the session cookie.
    /// Returns None on any failure; the caller decides how to react.
    pub async fn refresh_token(&self) -> Option<String> {
        let result = self
            .http
            .post(self.url("/api/refresh-token"))
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(status = %r.status(), "Token refresh rejected");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed");
                return None;
            }
        };

        match response.json::<TokenResponse>().await {
            Ok(data) => {
                self.state.write().await.token = Some(data.token.clone());
                Some(data.token)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh response malformed");
                None
            }
        }
    }

    /// Issue a bearer-authenticated request with transparent token refresh.
    ///
    /// The builder closure is invoked once per attempt so the identical
    /// request can be replayed. Policy: refresh first if no token is held;
    /// on 401 refresh once and retry once; a second 401 is returned to the
    /// caller unmodified.
    pub async fn authenticated_request<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut token = self.state.read().await.token.clone();

        if token.is_none() {
            token = self.refresh_token().await;
        }
        let token = token.ok_or(ClientError::NoTokenAvailable)?;

        let response = build(&self.http).bearer_auth(&token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Request rejected with 401, refreshing token and retrying once");
            if let Some(new_token) = self.refresh_token().await {
                return Ok(build(&self.http).bearer_auth(new_token).send().await?);
            }
        }

        Ok(response)
    }

    /// [`authenticated_request`](Self::authenticated_request) specialized for
    /// multipart bodies, with an extended timeout for slow external
    /// processing. Same single-retry-on-401 policy.
    pub async fn authenticated_form_request<F>(
        &self,
        path: &str,
        make_form: F,
    ) -> Result<Response, ClientError>
    where
        F: Fn() -> Form,
    {
        let url = self.url(path);
        self.authenticated_request(|http| {
            http.post(&url).multipart(make_form()).timeout(FORM_TIMEOUT)
        })
        .await
    }

    /// URL the browser must be sent to for OAuth login
    pub fn login_url(&self) -> String {
        self.url("/auth/google")
    }

    /// Forget everything held locally, then tell the server to destroy the
    /// session. The server-side logout is idempotent, so a failed request
    /// still leaves the client consistently logged out.
    pub async fn logout(&self) {
        {
            let mut state = self.state.write().await;
            state.user = None;
            state.token = None;
            state.audiobooks.clear();
        }

        if let Err(e) = self.http.get(self.url("/auth/logout")).send().await {
            warn!(error = %e, "Logout request failed");
        }
    }

    pub(crate) async fn cache_audiobooks(&self, books: Vec<Audiobook>) {
        self.state.write().await.audiobooks = books;
    }

    pub(crate) async fn cache_insert_front(&self, book: Audiobook) {
        self.state.write().await.audiobooks.insert(0, book);
    }

    pub(crate) async fn cache_remove(&self, file_id: &str) {
        self.state
            .write()
            .await
            .audiobooks
            .retain(|b| b.file_id != file_id);
    }
}
