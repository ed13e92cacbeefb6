#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Shared infrastructure for streakd services: database pool construction,
//! schema migrations, and the unix-seconds clock used everywhere.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use time::OffsetDateTime;

/// Create the application connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Run embedded migrations against the given pool.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Current unix time in whole seconds.
///
/// All persisted timestamps (user/session/activity creation, session expiry)
/// use this representation.
pub fn unix_time() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_time_is_past_2024() {
        // 2024-01-01T00:00:00Z
        assert!(unix_time() > 1_704_067_200);
    }
}
