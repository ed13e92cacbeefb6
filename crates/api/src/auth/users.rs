//! Credential store
//!
//! Query layer over the `users` table. Rows are created on registration and
//! never mutated; deletion cascades to sessions, activities, and histories.

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// Insert a new user. Returns `None` on a username conflict.
pub async fn create_user(
    pool: &PgPool,
    user_id: Uuid,
    username: &str,
    password_hash: &str,
    created_at: i64,
) -> Result<Option<User>, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_id, username, password_hash, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(password_hash)
    .bind(created_at)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(Some(User {
            user_id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Exact, case-sensitive username lookup.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, password_hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, username, password_hash, created_at
        FROM users
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Delete a user row; sessions and activities go with it via FK cascade.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}
