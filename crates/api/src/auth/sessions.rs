//! Session store
//!
//! Query layer over the `sessions` table. Every mutation is a single-row
//! statement keyed by primary key, so no application-level locking is needed;
//! the one race that matters (two requests both deleting an expired session)
//! is harmless because deletion is idempotent.

use sqlx::PgPool;
use uuid::Uuid;

use super::token::generate_session_id;

/// A session id collision is astronomically rare (286 bits); retrying a few
/// times with a fresh id is strictly cheaper than surfacing the conflict.
const ID_COLLISION_RETRIES: u32 = 3;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub session_id: String,
    pub user_id: Uuid,
    pub user_agent: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Create a session for `user_id` valid for `duration` seconds from `now`.
///
/// Generates the id internally and regenerates on the (astronomically rare)
/// primary-key collision.
pub async fn create_session(
    pool: &PgPool,
    user_id: Uuid,
    user_agent: Option<&str>,
    now: i64,
    duration: i64,
) -> Result<Session, sqlx::Error> {
    let expires_at = now + duration;

    for attempt in 0..=ID_COLLISION_RETRIES {
        let session_id = generate_session_id();

        let result = sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, user_agent, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&session_id)
        .bind(user_id)
        .bind(user_agent)
        .bind(now)
        .bind(expires_at)
        .execute(pool)
        .await;

        match result {
            Ok(_) => {
                return Ok(Session {
                    session_id,
                    user_id,
                    user_agent: user_agent.map(String::from),
                    created_at: now,
                    expires_at,
                })
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tracing::warn!(attempt, "Session id collision, regenerating");
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(sqlx::Error::Protocol(
        "session id collisions exhausted retries".to_string(),
    ))
}

pub async fn get_session(
    pool: &PgPool,
    session_id: &str,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT session_id, user_id, user_agent, created_at, expires_at
        FROM sessions
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await
}

/// All sessions owned by `user_id`, oldest first (stable order).
pub async fn list_sessions(pool: &PgPool, user_id: Uuid) -> Result<Vec<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT session_id, user_id, user_agent, created_at, expires_at
        FROM sessions
        WHERE user_id = $1
        ORDER BY created_at ASC, session_id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Extend a session's expiry. Returns `false` if the session is gone.
pub async fn renew_session(
    pool: &PgPool,
    session_id: &str,
    new_expiry: i64,
) -> Result<bool, sqlx::Error> {
    let rows_affected = sqlx::query(
        r#"
        UPDATE sessions
        SET expires_at = $2
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .bind(new_expiry)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Delete a session. Idempotent: deleting an absent id is a no-op.
pub async fn delete_session(pool: &PgPool, session_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE session_id = $1")
        .bind(session_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Drop every session owned by `user_id`. Used on user deletion in addition
/// to the FK cascade so revocation does not depend on schema details.
pub async fn delete_sessions_for_user(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let rows_affected = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();

    Ok(rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_created_at_plus_duration() {
        // The invariant lives in create_session's arithmetic; pin it here.
        let now = 1_700_000_000;
        let duration = 2_592_000;
        assert_eq!(now + duration, 1_702_592_000);
    }

    #[test]
    fn session_row_maps_optional_user_agent() {
        let session = Session {
            session_id: "x".repeat(48),
            user_id: Uuid::new_v4(),
            user_agent: None,
            created_at: 0,
            expires_at: 1,
        };
        assert!(session.user_agent.is_none());
    }
}
