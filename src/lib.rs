//! Audiobook API backend.
//!
//! A thin REST layer over three external collaborators: the Google OAuth
//! identity provider, a SQLite store for user and audiobook records, and an
//! S3 bucket for the audio blobs. The auth design is dual-mode: a cookie
//! session for same-origin browser navigation plus short-lived bearer tokens
//! for cross-origin API calls.

pub mod audiobooks;
pub mod auth;
pub mod common;
pub mod services;
