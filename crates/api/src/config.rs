//! Environment-backed configuration

use anyhow::Context;

/// Default session lifetime: 30 days in seconds.
const DEFAULT_SESSION_DURATION: i64 = 2_592_000;

/// Process-wide configuration, loaded once at startup and carried in
/// [`crate::state::AppState`].
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub bind_address: String,
    /// How long a session lives, in seconds. Applied at session creation
    /// and at every renewal.
    pub session_duration: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let session_duration = match std::env::var("SESSION_DURATION") {
            Ok(raw) => raw
                .parse::<i64>()
                .context("SESSION_DURATION must be an integer number of seconds")?,
            Err(_) => DEFAULT_SESSION_DURATION,
        };
        anyhow::ensure!(
            session_duration > 0,
            "SESSION_DURATION must be a positive number of seconds"
        );

        Ok(Self {
            database_url,
            bind_address,
            session_duration,
        })
    }
}
