use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{CreateHabitRequest, UpdateHabitRequest};
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path};
use crate::handlers::{fetch_active_habits, fetch_completed_entries, fetch_owned_habit, group_by_habit};
use crate::models::habit::{Habit, HabitWithStatus, DEFAULT_HABIT_COLOR};
use crate::services::progress::{compute_longest_streak, compute_streak, is_completed_on};
use crate::AppState;

pub async fn list_habits(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Vec<HabitWithStatus>>> {
    let now = Utc::now();
    let today = now.date_naive();

    let habits = fetch_active_habits(&state.db, auth_user.id).await?;
    let habit_ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
    let entries = fetch_completed_entries(&state.db, &habit_ids, None).await?;
    let snapshots = group_by_habit(&habits, entries);

    let result = habits
        .into_iter()
        .zip(snapshots)
        .map(|(habit, snapshot)| HabitWithStatus {
            completed_today: is_completed_on(&snapshot.entries, today),
            current_streak: compute_streak(&snapshot.entries, &now),
            longest_streak: compute_longest_streak(&snapshot.entries),
            habit,
        })
        .collect();

    Ok(Json(result))
}

pub async fn get_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<Habit>> {
    let habit = fetch_owned_habit(&state.db, habit_id, auth_user.id).await?;
    Ok(Json(habit))
}

pub async fn create_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(body): JsonBody<CreateHabitRequest>,
) -> AppResult<(StatusCode, Json<Habit>)> {
    body.validate()?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        INSERT INTO habits (id, user_id, title, description, color, is_active)
        VALUES ($1, $2, $3, $4, $5, true)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(body.title.trim())
    .bind(body.description.as_deref().filter(|d| !d.is_empty()))
    .bind(body.color.as_deref().unwrap_or(DEFAULT_HABIT_COLOR))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth_user.id, habit_id = %habit.id, "Habit created");

    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateHabitRequest>,
) -> AppResult<Json<Habit>> {
    body.validate()?;

    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET
            title = COALESCE($3, title),
            description = COALESCE($4, description),
            color = COALESCE($5, color),
            is_active = COALESCE($6, is_active)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(habit_id)
    .bind(auth_user.id)
    .bind(body.title.as_deref().map(str::trim))
    .bind(&body.description)
    .bind(&body.color)
    .bind(body.is_active)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Habit not found".into()))?;

    Ok(Json(habit))
}

/// Soft-retires a habit. Entries stay; retiring twice is a no-op.
pub async fn retire_habit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
) -> AppResult<Json<Habit>> {
    let habit = sqlx::query_as::<_, Habit>(
        r#"
        UPDATE habits SET is_active = false
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(habit_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound("Habit not found".into()))?;

    tracing::info!(user_id = %auth_user.id, habit_id = %habit.id, "Habit retired");

    Ok(Json(habit))
}
