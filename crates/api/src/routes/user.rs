//! Current-user resource

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::cookie::clear_session_cookie;
use crate::auth::{sessions, users, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::routes::auth::UserOut;
use crate::state::AppState;

/// `GET /v1/user`: the caller's own record.
pub async fn get_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<UserOut>> {
    let record = users::find_by_id(&state.pool, user.user_id)
        .await?
        // A valid session without a user row means the user was deleted out
        // from under it; treat the session as invalid.
        .ok_or(ApiError::InvalidSession)?;

    Ok(Json(UserOut {
        user_id: record.user_id,
        username: record.username,
        created_at: record.created_at,
    }))
}

/// `DELETE /v1/user`: delete the caller's account.
///
/// Sessions are revoked explicitly before the row goes away (the FK cascade
/// would also remove them; doing it here keeps revocation independent of
/// schema details), then activities and histories cascade.
pub async fn delete_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Response> {
    let revoked = sessions::delete_sessions_for_user(&state.pool, user.user_id).await?;
    users::delete_user(&state.pool, user.user_id).await?;

    tracing::info!(user_id = %user.user_id, sessions_revoked = revoked, "User deleted");

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "User deleted" })),
    )
        .into_response())
}
