//! Application state

use sqlx::PgPool;

use crate::config::Config;

/// Shared application state: the injected store handle plus configuration.
/// Cloned per request by axum; both fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self { pool, config }
    }

    /// Session lifetime in seconds, fixed process-wide.
    pub fn session_duration(&self) -> i64 {
        self.config.session_duration
    }
}
