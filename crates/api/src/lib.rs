#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! streakd API library
//!
//! Habit/activity tracker with cookie-backed session authentication.
//! Users register, log in, and track daily completion of activities as
//! per-month day bitmaps.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod validate;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
