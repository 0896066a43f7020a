//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Google OAuth login flow and the session cookie it establishes
//! - Bearer token issuance and stateless verification
//! - The identity bridge resolving OAuth profiles to user records
//! - AuthedUser / SessionUser extractors for protected routes

pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;
pub mod sessions;
pub mod tokens;

#[cfg(test)]
mod tests;

pub use extractors::{AuthedUser, SessionUser};
pub use models::User;
pub use routes::auth_routes;
pub use tokens::TokenIssuer;
