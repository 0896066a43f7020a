//! # Audiobooks Module
//!
//! Bearer-token-gated library CRUD: listing, storing, deleting and generating
//! download URLs for a user's generated audiobooks. Metadata lives in the
//! relational store; the audio blobs live in object storage keyed by a
//! generated file id.

pub mod handlers;
pub mod models;
pub mod routes;

pub use models::Audiobook;
pub use routes::audiobook_routes;
