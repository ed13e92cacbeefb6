//! Route wiring

pub mod activities;
pub mod auth;
pub mod sessions;
pub mod user;

use axum::middleware;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::auth::validate_session;
use crate::state::AppState;

/// Build the application router.
///
/// The session validator is layered over every route; per-route authorization
/// is explicit via the [`crate::auth::CurrentUser`] extractor, so register,
/// login, and status remain reachable anonymously while everything else
/// rejects with 401 when no identity was attached.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login))
        .route(
            "/v1/sessions",
            get(sessions::list_sessions)
                .patch(sessions::renew_session)
                .delete(sessions::revoke_session),
        )
        .route("/v1/user", get(user::get_user).delete(user::delete_user))
        .route(
            "/v1/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/v1/activities/{activity_id}",
            patch(activities::update_activity).delete(activities::delete_activity),
        )
        .route(
            "/v1/activities/{activity_id}/{year}/{month}",
            get(activities::get_history),
        )
        .route(
            "/v1/activities/{activity_id}/{year}/{month}/{day}",
            patch(activities::toggle_history_day),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            validate_session,
        ))
        .with_state(state)
}

async fn status() -> Json<Value> {
    Json(json!({ "status_code": 200 }))
}
