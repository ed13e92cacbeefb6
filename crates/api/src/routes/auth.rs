//! Registration and login

use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use streakd_shared::unix_time;
use uuid::Uuid;

use crate::auth::cookie::session_cookie;
use crate::auth::{password, sessions, users};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::{validate_password, validate_username};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserOut {
    pub user_id: Uuid,
    pub username: String,
    pub created_at: i64,
}

fn user_agent_of(headers: &HeaderMap) -> Option<&str> {
    headers.get(USER_AGENT).and_then(|h| h.to_str().ok())
}

/// `POST /v1/auth/register`
///
/// Creates the user and an initial session; 201 with the session cookie set,
/// 409 when the username is taken (case-sensitive exact match).
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<Response> {
    validate_username(&body.username)?;
    validate_password(&body.password)?;

    let password_hash =
        password::hash_password(&body.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let now = unix_time();
    let user = users::create_user(&state.pool, Uuid::new_v4(), &body.username, &password_hash, now)
        .await?
        .ok_or_else(|| ApiError::Conflict("This username is already taken".to_string()))?;

    let session = sessions::create_session(
        &state.pool,
        user.user_id,
        user_agent_of(&headers),
        now,
        state.session_duration(),
    )
    .await?;

    tracing::info!(user_id = %user.user_id, "User registered");

    Ok((
        StatusCode::CREATED,
        [(
            SET_COOKIE,
            session_cookie(&session.session_id, state.session_duration()),
        )],
        Json(UserOut {
            user_id: user.user_id,
            username: user.username,
            created_at: user.created_at,
        }),
    )
        .into_response())
}

/// `POST /v1/auth/login`
///
/// Issues a fresh session without touching existing ones (multiple devices
/// hold concurrent sessions). Unknown username and wrong password answer
/// identically, and the unknown-username path still pays for one Argon2
/// verification so the two are not distinguishable by timing either.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<Response> {
    let user = users::find_by_username(&state.pool, &body.username).await?;

    let verified = match &user {
        Some(user) => password::verify_password(&body.password, &user.password_hash),
        None => {
            password::verify_password(&body.password, password::dummy_hash());
            false
        }
    };

    let Some(user) = user.filter(|_| verified) else {
        return Err(ApiError::InvalidCredentials);
    };

    let session = sessions::create_session(
        &state.pool,
        user.user_id,
        user_agent_of(&headers),
        unix_time(),
        state.session_duration(),
    )
    .await?;

    tracing::debug!(user_id = %user.user_id, "Login succeeded");

    Ok((
        StatusCode::OK,
        [(
            SET_COOKIE,
            session_cookie(&session.session_id, state.session_duration()),
        )],
        Json(UserOut {
            user_id: user.user_id,
            username: user.username,
            created_at: user.created_at,
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn user_agent_header_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        assert_eq!(user_agent_of(&headers), Some("curl/8.0"));
        assert_eq!(user_agent_of(&HeaderMap::new()), None);
    }

    #[test]
    fn credentials_request_deserializes() {
        let body: CredentialsRequest =
            serde_json::from_str(r#"{"username": "alice1", "password": "hunter2pass"}"#).unwrap();
        assert_eq!(body.username, "alice1");
        assert_eq!(body.password, "hunter2pass");
    }

    #[test]
    fn user_out_serializes_without_password_fields() {
        let out = UserOut {
            user_id: Uuid::new_v4(),
            username: "alice1".to_string(),
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice1");
    }
}
