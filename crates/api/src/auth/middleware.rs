//! Session validation middleware
//!
//! Runs on every inbound request before route dispatch. Five outcomes:
//!
//! - no cookie: request proceeds unauthenticated (routes that need identity
//!   reject via the [`CurrentUser`] extractor),
//! - malformed cookie: 401 "Invalid session", no store access,
//! - unknown id: 401 "Invalid session" (same body as malformed, so the
//!   response does not reveal which case occurred),
//! - expired: session row deleted eagerly, 401 "Session expired", cookie
//!   cleared,
//! - valid: [`CurrentUser`] attached to request extensions, handler runs.
//!
//! Expiry is checked here on every request rather than by a background sweep,
//! so no request is ever served against a stale session.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use streakd_shared::unix_time;
use uuid::Uuid;

use super::cookie::extract_session_id;
use super::sessions;
use super::token::is_valid_session_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Identity resolved from a valid session, attached to request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub session_id: String,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(ApiError::InvalidSession)
    }
}

/// Middleware validating the session cookie on every request.
pub async fn validate_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = extract_session_id(request.headers()) else {
        // Anonymous request; per-route auth is enforced by CurrentUser.
        return next.run(request).await;
    };

    if !is_valid_session_id(&session_id) {
        return ApiError::InvalidSession.into_response();
    }

    let session = match sessions::get_session(&state.pool, &session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return ApiError::InvalidSession.into_response(),
        Err(e) => return ApiError::Database(e).into_response(),
    };

    if unix_time() > session.expires_at {
        // Eager cleanup: the record is removed the moment expiry is observed.
        // Deletion is idempotent, so a concurrent request racing us is fine.
        if let Err(e) = sessions::delete_session(&state.pool, &session_id).await {
            return ApiError::Database(e).into_response();
        }
        tracing::debug!(
            user_id = %session.user_id,
            "Expired session removed during validation"
        );
        return ApiError::SessionExpired.into_response();
    }

    request.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        session_id,
    });
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::COOKIE;

    #[tokio::test]
    async fn missing_extension_rejects_with_invalid_session() {
        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = CurrentUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(ApiError::InvalidSession)));
    }

    #[tokio::test]
    async fn attached_extension_is_recovered() {
        let user = CurrentUser {
            user_id: Uuid::new_v4(),
            session_id: "a".repeat(48),
        };

        let request = axum::http::Request::builder()
            .header(COOKIE, format!("session_id={}", user.session_id))
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        parts.extensions.insert(user.clone());

        let recovered = CurrentUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(recovered.user_id, user.user_id);
        assert_eq!(recovered.session_id, user.session_id);
    }
}
