//! Client error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token is held and the cookie session could not mint one;
    /// the caller must treat this as "not logged in"
    #[error("no authentication token available")]
    NoTokenAvailable,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered, but not with a status this operation can use.
    /// A 401 here means the single refresh-and-retry already happened.
    #[error("server returned unexpected status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}
