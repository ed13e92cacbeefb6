//! Activities and completion history
//!
//! Consumers of the identity layer: every handler requires a validated
//! session and enforces ownership itself (404 for an unknown activity, 401
//! for someone else's). History is a per-month bitmap: bit `day - 1` set
//! means the day was completed.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use streakd_shared::unix_time;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::{validate_day, validate_description, validate_title, validate_year_month};

#[derive(Debug, Clone, sqlx::FromRow)]
struct ActivityRow {
    activity_id: Uuid,
    user_id: Uuid,
    title: String,
    description: Option<String>,
    created_at: i64,
    ended_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityIn {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `true` stamps `ended_at = now`; absent or `false` leaves it alone.
    pub end: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ActivityOut {
    pub activity_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub ended_at: Option<i64>,
}

impl From<ActivityRow> for ActivityOut {
    fn from(row: ActivityRow) -> Self {
        Self {
            activity_id: row.activity_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            ended_at: row.ended_at,
        }
    }
}

/// Fetch an activity and enforce that `user_id` owns it.
async fn fetch_owned_activity(
    pool: &PgPool,
    activity_id: Uuid,
    user_id: Uuid,
) -> Result<ActivityRow, ApiError> {
    let row = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT activity_id, user_id, title, description, created_at, ended_at
        FROM activities
        WHERE activity_id = $1
        "#,
    )
    .bind(activity_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    if row.user_id != user_id {
        return Err(ApiError::Unauthorized);
    }
    Ok(row)
}

/// `GET /v1/activities`
pub async fn list_activities(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<Vec<ActivityOut>>> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT activity_id, user_id, title, description, created_at, ended_at
        FROM activities
        WHERE user_id = $1
        ORDER BY created_at ASC, activity_id ASC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows.into_iter().map(ActivityOut::from).collect()))
}

/// `POST /v1/activities`
pub async fn create_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<ActivityIn>,
) -> ApiResult<Json<ActivityOut>> {
    validate_title(&body.title)?;
    if let Some(description) = &body.description {
        validate_description(description)?;
    }

    let row = ActivityRow {
        activity_id: Uuid::new_v4(),
        user_id: user.user_id,
        title: body.title,
        description: body.description,
        created_at: unix_time(),
        ended_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO activities (activity_id, user_id, title, description, created_at, ended_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(row.activity_id)
    .bind(row.user_id)
    .bind(&row.title)
    .bind(&row.description)
    .bind(row.created_at)
    .bind(row.ended_at)
    .execute(&state.pool)
    .await?;

    tracing::debug!(user_id = %user.user_id, activity_id = %row.activity_id, "Activity created");

    Ok(Json(row.into()))
}

/// `PATCH /v1/activities/{activity_id}`
pub async fn update_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(activity_id): Path<Uuid>,
    Json(body): Json<ActivityUpdate>,
) -> ApiResult<Json<ActivityOut>> {
    let mut row = fetch_owned_activity(&state.pool, activity_id, user.user_id).await?;

    if let Some(title) = body.title {
        validate_title(&title)?;
        row.title = title;
    }
    if let Some(description) = body.description {
        validate_description(&description)?;
        row.description = Some(description);
    }
    if body.end == Some(true) {
        row.ended_at = Some(unix_time());
    }

    sqlx::query(
        r#"
        UPDATE activities
        SET title = $2, description = $3, ended_at = $4
        WHERE activity_id = $1
        "#,
    )
    .bind(row.activity_id)
    .bind(&row.title)
    .bind(&row.description)
    .bind(row.ended_at)
    .execute(&state.pool)
    .await?;

    Ok(Json(row.into()))
}

/// `DELETE /v1/activities/{activity_id}`
pub async fn delete_activity(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(activity_id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    fetch_owned_activity(&state.pool, activity_id, user.user_id).await?;

    sqlx::query("DELETE FROM activities WHERE activity_id = $1")
        .bind(activity_id)
        .execute(&state.pool)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Activity deleted" })))
}

/// `GET /v1/activities/{activity_id}/{year}/{month}`
///
/// Completed day numbers for the month, decoded from the bitmap. A month
/// with no record is an empty list, not a 404.
pub async fn get_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((activity_id, year, month)): Path<(Uuid, i32, i32)>,
) -> ApiResult<Json<Vec<u32>>> {
    validate_year_month(year, month)?;
    fetch_owned_activity(&state.pool, activity_id, user.user_id).await?;

    let bitmap: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT days
        FROM histories
        WHERE activity_id = $1 AND year = $2 AND month = $3
        "#,
    )
    .bind(activity_id)
    .bind(year)
    .bind(month)
    .fetch_optional(&state.pool)
    .await?;

    Ok(Json(days_from_bitmap(bitmap.unwrap_or(0))))
}

/// `PATCH /v1/activities/{activity_id}/{year}/{month}/{day}`
///
/// Toggle one day's completion bit, creating the month row on first touch.
pub async fn toggle_history_day(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((activity_id, year, month, day)): Path<(Uuid, i32, i32, i32)>,
) -> ApiResult<Json<serde_json::Value>> {
    validate_year_month(year, month)?;
    validate_day(day)?;
    fetch_owned_activity(&state.pool, activity_id, user.user_id).await?;

    let bit = day_bit(day);

    // XOR upsert: first touch inserts the bit, later touches flip it.
    sqlx::query(
        r#"
        INSERT INTO histories (history_id, activity_id, year, month, days)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (activity_id, year, month)
        DO UPDATE SET days = histories.days # EXCLUDED.days
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(activity_id)
    .bind(year)
    .bind(month)
    .bind(bit)
    .execute(&state.pool)
    .await?;

    Ok(Json(serde_json::json!({ "message": "History updated" })))
}

fn day_bit(day: i32) -> i64 {
    1_i64 << (day - 1)
}

/// Decode a month bitmap into ascending 1-based day numbers.
fn days_from_bitmap(bitmap: i64) -> Vec<u32> {
    (0u32..31)
        .filter(|&shift| bitmap >> shift & 1 == 1)
        .map(|shift| shift + 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_bitmap_decodes_to_no_days() {
        assert!(days_from_bitmap(0).is_empty());
    }

    #[test]
    fn bitmap_decodes_to_one_based_days() {
        // Days 1, 3, and 31.
        let bitmap = day_bit(1) | day_bit(3) | day_bit(31);
        assert_eq!(days_from_bitmap(bitmap), vec![1, 3, 31]);
    }

    #[test]
    fn full_month_decodes_to_all_days() {
        let bitmap = (1_i64 << 31) - 1;
        let days = days_from_bitmap(bitmap);
        assert_eq!(days.len(), 31);
        assert_eq!(days.first(), Some(&1));
        assert_eq!(days.last(), Some(&31));
    }

    #[test]
    fn toggling_a_bit_twice_restores_the_bitmap() {
        let start = day_bit(5) | day_bit(12);
        let toggled = start ^ day_bit(7);
        assert_eq!(days_from_bitmap(toggled), vec![5, 7, 12]);
        assert_eq!(toggled ^ day_bit(7), start);
    }

    #[test]
    fn day_bits_are_disjoint() {
        let all: i64 = (1..=31).map(day_bit).sum();
        assert_eq!(all, (1_i64 << 31) - 1);
    }

    #[test]
    fn activity_update_deserializes_partial_bodies() {
        let update: ActivityUpdate = serde_json::from_str(r#"{"end": true}"#).unwrap();
        assert!(update.title.is_none());
        assert!(update.description.is_none());
        assert_eq!(update.end, Some(true));
    }
}
