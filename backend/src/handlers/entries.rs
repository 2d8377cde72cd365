use axum::{
    extract::State,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{DateRangeQuery, ToggleQuery, UpdateNotesRequest};
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path, Query};
use crate::handlers::fetch_owned_habit;
use crate::models::entry::HabitEntry;
use crate::AppState;

/// Flips the habit's entry for the day. The first toggle of a day creates the
/// entry as completed; later toggles flip it in place. The upsert on
/// `(habit_id, date)` keeps concurrent toggles to a single row.
pub async fn toggle_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
    Query(query): Query<ToggleQuery>,
) -> AppResult<Json<HabitEntry>> {
    let date = query
        .resolve_date(Utc::now().date_naive())
        .map_err(AppError::Validation)?;

    fetch_owned_habit(&state.db, habit_id, auth_user.id).await?;

    let entry = sqlx::query_as::<_, HabitEntry>(
        r#"
        INSERT INTO habit_entries (id, habit_id, date, completed)
        VALUES ($1, $2, $3, true)
        ON CONFLICT (habit_id, date) DO UPDATE
            SET completed = NOT habit_entries.completed
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(habit_id)
    .bind(date)
    .fetch_one(&state.db)
    .await?;

    tracing::debug!(
        user_id = %auth_user.id,
        habit_id = %habit_id,
        date = %date,
        completed = entry.completed,
        "Habit entry toggled"
    );

    Ok(Json(entry))
}

pub async fn update_entry_notes(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((habit_id, date)): Path<(Uuid, NaiveDate)>,
    JsonBody(body): JsonBody<UpdateNotesRequest>,
) -> AppResult<Json<HabitEntry>> {
    body.validate()?;

    fetch_owned_habit(&state.db, habit_id, auth_user.id).await?;

    let entry = sqlx::query_as::<_, HabitEntry>(
        r#"
        UPDATE habit_entries SET notes = $3
        WHERE habit_id = $1 AND date = $2
        RETURNING *
        "#,
    )
    .bind(habit_id)
    .bind(date)
    .bind(body.notes.as_deref().filter(|n| !n.is_empty()))
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("No entry for that day".into()))?;

    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<HabitEntry>>> {
    let window = query
        .resolve(Utc::now().date_naive(), state.config.default_window_days)
        .map_err(AppError::Validation)?;

    fetch_owned_habit(&state.db, habit_id, auth_user.id).await?;

    let entries = sqlx::query_as::<_, HabitEntry>(
        r#"
        SELECT * FROM habit_entries
        WHERE habit_id = $1 AND date BETWEEN $2 AND $3
        ORDER BY date DESC
        "#,
    )
    .bind(habit_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(entries))
}
