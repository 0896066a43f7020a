//! Identity bridge: exchanges a completed OAuth handshake for a durable user
//! record with create-or-update semantics.

use sqlx::SqlitePool;
use tracing::{debug, error, info};

use super::models::{ExternalProfile, User};
use crate::common::{generate_user_id, safe_email_log, ApiError};

/// Look up the user for an external profile, creating the record on first
/// login and refreshing the last-login timestamp otherwise.
///
/// Creation is a plain INSERT on purpose: two near-simultaneous first-time
/// logins for the same external id race, and the UNIQUE constraint on
/// google_id must fail the later writer rather than silently merging. A store
/// failure propagates and the caller fails the OAuth callback closed.
pub async fn resolve_or_create_user(
    pool: &SqlitePool,
    profile: &ExternalProfile,
) -> Result<User, ApiError> {
    let existing: Option<User> =
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = ?")
            .bind(&profile.id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    provider_id = %profile.id,
                    "Database error checking existing user during OAuth flow"
                );
                ApiError::DatabaseError(e)
            })?;

    if let Some(user) = existing {
        debug!(
            user_id = %user.id,
            provider_id = %profile.id,
            "Found existing user, updating last login"
        );

        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(chrono::Utc::now().to_rfc3339())
            .bind(&user.id)
            .execute(pool)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %user.id, "Failed to update last login");
                ApiError::DatabaseError(e)
            })?;

        return Ok(user);
    }

    let id = generate_user_id();
    let email = profile.email.clone().unwrap_or_default();
    let name = profile.name.clone().unwrap_or_default();
    let now = chrono::Utc::now().to_rfc3339();

    info!(
        user_id = %id,
        email = %safe_email_log(&email),
        "Creating new user account via Google OAuth"
    );

    sqlx::query(
        r#"
        INSERT INTO users (id, google_id, email, name, avatar, created_at, last_login)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&profile.id)
    .bind(&email)
    .bind(&name)
    .bind(profile.picture.as_deref())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .map_err(|e| {
        error!(
            error = %e,
            user_id = %id,
            provider_id = %profile.id,
            "Database error inserting new user during OAuth flow"
        );
        ApiError::DatabaseError(e)
    })?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %id, "Database error fetching newly created user");
            ApiError::DatabaseError(e)
        })?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "New user account created successfully via Google OAuth"
    );

    Ok(user)
}
