//! Session listing, renewal, and revocation
//!
//! Every handler operates on the caller's own identity as resolved by the
//! session validator, never on a user id taken from the request, so one
//! user can never enumerate or revoke another user's sessions.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use streakd_shared::unix_time;

use crate::auth::cookie::clear_session_cookie;
use crate::auth::{sessions, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub session_id: String,
    pub user_agent: Option<String>,
    pub created_at: i64,
    pub expires_at: i64,
}

impl From<sessions::Session> for SessionOut {
    fn from(session: sessions::Session) -> Self {
        Self {
            session_id: session.session_id,
            user_agent: session.user_agent,
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

/// `GET /v1/sessions`: all sessions owned by the caller, oldest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<SessionOut>>> {
    let sessions = sessions::list_sessions(&state.pool, user.user_id).await?;
    Ok(Json(sessions.into_iter().map(SessionOut::from).collect()))
}

/// `PATCH /v1/sessions`: extend the caller's own session to
/// now + SESSION_DURATION.
pub async fn renew_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Response> {
    let new_expiry = unix_time() + state.session_duration();

    let renewed = sessions::renew_session(&state.pool, &user.session_id, new_expiry).await?;
    if !renewed {
        // The session vanished between validation and renewal; same answer
        // as any other unknown session.
        return Err(ApiError::InvalidSession);
    }

    Ok((StatusCode::OK, Json(json!({ "expires_at": new_expiry }))).into_response())
}

/// `DELETE /v1/sessions`: revoke the caller's own session (logout).
pub async fn revoke_session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Response> {
    sessions::delete_session(&state.pool, &user.session_id).await?;

    tracing::debug!(user_id = %user.user_id, "Session revoked");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out" })),
    )
        .into_response())
}
