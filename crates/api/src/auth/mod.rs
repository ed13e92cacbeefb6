//! Authentication module for streakd

pub mod cookie;
pub mod middleware;
#[cfg(test)]
mod middleware_tests;
pub mod password;
pub mod sessions;
pub mod token;
pub mod users;

pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use middleware::{validate_session, CurrentUser};
pub use password::{hash_password, verify_password};
pub use token::{generate_session_id, is_valid_session_id, SESSION_ID_LEN};
