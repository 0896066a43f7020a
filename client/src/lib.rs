//! API client for the audiobook backend.
//!
//! Holds the browser-side auth state described by the backend's dual-mode
//! design: the cookie session authenticates the `/api/user` and
//! `/api/refresh-token` endpoints, while every other API call carries a
//! short-lived bearer token. The client refreshes that token transparently
//! when a call bounces with 401, retrying the request exactly once.

pub mod auth;
pub mod error;
pub mod library;
pub mod models;

pub use auth::AuthClient;
pub use error::ClientError;
pub use models::{Audiobook, DownloadInfo, User};
