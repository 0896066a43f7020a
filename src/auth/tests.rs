//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - Bearer token issuance and verification
//! - Expired vs invalid token distinction
//! - Session store semantics
//! - Identity bridge create-or-update behavior

use crate::auth::identity::resolve_or_create_user;
use crate::auth::models::{Claims, ExternalProfile, User};
use crate::auth::sessions::SessionStore;
use crate::auth::tokens::{TokenError, TokenIssuer, TOKEN_LIFETIME_SECS};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::sqlite::SqlitePoolOptions;

fn test_user() -> User {
    User {
        id: "US_TEST01".to_string(),
        google_id: "g1".to_string(),
        email: "a@x.com".to_string(),
        name: "A".to_string(),
        avatar: None,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        last_login: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// Encode claims directly, bypassing the issuer, to control timestamps
fn encode_claims(secret: &str, claims: &Claims) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode token")
}

#[test]
fn test_issue_and_verify_roundtrip() {
    let issuer = TokenIssuer::new("test_secret_key");
    let user = test_user();

    let token = issuer.issue(&user).expect("Failed to issue token");
    let claims = issuer.verify(&token).expect("Failed to verify token");

    // Exactly the claims embedded at issuance are exposed
    assert_eq!(claims.sub, "US_TEST01");
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.name, "A");
    assert_eq!(claims.exp, claims.iat + TOKEN_LIFETIME_SECS as usize);
}

#[test]
fn test_expired_token_is_expired_not_invalid() {
    let secret = "test_secret_key";
    let issuer = TokenIssuer::new(secret);

    let two_hours_ago = (Utc::now().timestamp() - 7200) as usize;
    let claims = Claims {
        sub: "US_TEST01".to_string(),
        email: "a@x.com".to_string(),
        name: "A".to_string(),
        iat: two_hours_ago,
        exp: two_hours_ago + 3600,
    };

    let token = encode_claims(secret, &claims);
    assert_eq!(issuer.verify(&token).unwrap_err(), TokenError::Expired);
}

#[test]
fn test_wrong_secret_is_invalid() {
    let issuer = TokenIssuer::new("test_secret_key");
    let other = TokenIssuer::new("wrong_secret_key");

    let token = issuer.issue(&test_user()).unwrap();
    assert_eq!(other.verify(&token).unwrap_err(), TokenError::Invalid);
}

#[test]
fn test_malformed_token_is_invalid() {
    let issuer = TokenIssuer::new("test_secret_key");
    assert_eq!(
        issuer.verify("not-a-jwt-at-all").unwrap_err(),
        TokenError::Invalid
    );
}

#[test]
fn test_two_tokens_for_same_user_both_valid() {
    // Tokens are not single-use: two issuances at different times yield
    // two distinct, independently verifiable tokens
    let secret = "test_secret_key";
    let issuer = TokenIssuer::new(secret);
    let now = Utc::now().timestamp() as usize;

    let first = encode_claims(
        secret,
        &Claims {
            sub: "US_TEST01".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            iat: now - 10,
            exp: now - 10 + 3600,
        },
    );
    let second = encode_claims(
        secret,
        &Claims {
            sub: "US_TEST01".into(),
            email: "a@x.com".into(),
            name: "A".into(),
            iat: now,
            exp: now + 3600,
        },
    );

    assert_ne!(first, second);
    assert!(issuer.verify(&first).is_ok());
    assert!(issuer.verify(&second).is_ok());
}

#[tokio::test]
async fn test_session_store_create_get_destroy() {
    let store = SessionStore::new();

    let id = store.create("US_TEST01").await;
    let session = store.get(&id).await.expect("session should exist");
    assert_eq!(session.user_id, "US_TEST01");

    assert!(store.destroy(&id).await);
    assert!(store.get(&id).await.is_none());

    // Logout is idempotent
    assert!(!store.destroy(&id).await);
    assert!(!store.destroy("never-existed").await);
}

async fn setup_test_db() -> sqlx::SqlitePool {
    let pool = SqlitePoolOptions::new()
        .connect("sqlite::memory:")
        .await
        .unwrap();
    crate::common::migrations::run_migrations(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn test_first_login_creates_user() {
    let pool = setup_test_db().await;

    let profile = ExternalProfile {
        id: "g1".to_string(),
        email: Some("a@x.com".to_string()),
        name: Some("A".to_string()),
        picture: None,
    };

    let user = resolve_or_create_user(&pool, &profile).await.unwrap();
    assert_eq!(user.google_id, "g1");
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.name, "A");
    // First login sets both timestamps to the login time
    assert_eq!(user.created_at, user.last_login);
}

#[tokio::test]
async fn test_missing_profile_fields_default_to_empty() {
    let pool = setup_test_db().await;

    let profile = ExternalProfile {
        id: "g2".to_string(),
        email: None,
        name: None,
        picture: None,
    };

    let user = resolve_or_create_user(&pool, &profile).await.unwrap();
    assert_eq!(user.email, "");
    assert_eq!(user.name, "");
    assert_eq!(user.avatar, None);
}

#[tokio::test]
async fn test_resolve_is_idempotent_per_external_id() {
    let pool = setup_test_db().await;

    let profile = ExternalProfile {
        id: "g1".to_string(),
        email: Some("a@x.com".to_string()),
        name: Some("A".to_string()),
        picture: None,
    };

    let first = resolve_or_create_user(&pool, &profile).await.unwrap();
    let second = resolve_or_create_user(&pool, &profile).await.unwrap();
    assert_eq!(first.id, second.id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE google_id = ?")
        .bind("g1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Second call only refreshed last_login
    let last_login: String =
        sqlx::query_scalar("SELECT last_login FROM users WHERE google_id = ?")
            .bind("g1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(last_login >= first.last_login);
}

#[tokio::test]
async fn test_duplicate_external_id_fails_the_later_writer() {
    // The uniqueness constraint is the only backstop for a concurrent
    // first-login race: a second raw INSERT for the same external id must
    // fail, never merge
    let pool = setup_test_db().await;

    let insert = |user_id: &str| {
        sqlx::query(
            "INSERT INTO users (id, google_id, email, name, created_at, last_login) VALUES (?, 'g1', '', '', '2024', '2024')",
        )
        .bind(user_id.to_string())
    };

    insert("US_AAAAAA").execute(&pool).await.unwrap();
    let result = insert("US_BBBBBB").execute(&pool).await;
    assert!(result.is_err());
}
