//! API error taxonomy and HTTP mapping
//!
//! Every failure surfaced to a client becomes a `{"message": ...}` JSON body.
//! Session lookups never answer 404: an unknown id and a malformed id are
//! indistinguishable to the caller (both 401 "Invalid session"). Store-layer
//! failures collapse to a generic 500 with the detail kept in the logs.

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::cookie::clear_session_cookie;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed input (bad username, bad path segment, ...). 400.
    #[error("{0}")]
    Validation(String),

    /// Missing, malformed, or unknown session cookie. 401.
    #[error("Invalid session")]
    InvalidSession,

    /// Session found but past its expiry. 401, with the cookie-clearing
    /// `Set-Cookie` attached.
    #[error("Session expired")]
    SessionExpired,

    /// Login failure. Unknown username and wrong password share this variant
    /// so the response leaks nothing about which occurred. 401.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Authenticated caller does not own the resource. 401.
    #[error("Unauthorized")]
    Unauthorized,

    /// Duplicate username. 409.
    #[error("{0}")]
    Conflict(String),

    /// Missing resource (activities and the like, never sessions). 404.
    #[error("{0}")]
    NotFound(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::SessionExpired) {
            return (
                StatusCode::UNAUTHORIZED,
                [(SET_COOKIE, clear_session_cookie())],
                Json(json!({ "message": "Session expired" })),
            )
                .into_response();
        }

        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InvalidSession => (StatusCode::UNAUTHORIZED, "Invalid session".to_string()),
            ApiError::SessionExpired => (StatusCode::UNAUTHORIZED, "Session expired".to_string()),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Database(e) => {
                tracing::error!(error = ?e, "Database query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            status_of(ApiError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn session_errors_map_to_401() {
        assert_eq!(status_of(ApiError::InvalidSession), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(ApiError::SessionExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_of(ApiError::Unauthorized), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn session_expired_clears_the_cookie() {
        let response = ApiError::SessionExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .unwrap();
        assert!(set_cookie.starts_with("session_id=; "));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[test]
    fn other_errors_do_not_touch_the_cookie() {
        let response = ApiError::InvalidSession.into_response();
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn conflict_maps_to_409() {
        assert_eq!(
            status_of(ApiError::Conflict("This username is already taken".into())),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            status_of(ApiError::NotFound("Activity not found".into())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn database_errors_hide_detail() {
        let err = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_credentials_message_is_uniform() {
        // Unknown user and wrong password must produce the same text.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }
}
