use axum::{
    extract::State,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{DateRangeQuery, UpsertFeedbackRequest};
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Query};
use crate::models::feedback::DailyFeedback;
use crate::AppState;

/// Creates or overwrites today's reflection; one row per (user, day).
pub async fn upsert_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(body): JsonBody<UpsertFeedbackRequest>,
) -> AppResult<Json<DailyFeedback>> {
    body.validate()?;

    let today = Utc::now().date_naive();

    let feedback = sqlx::query_as::<_, DailyFeedback>(
        r#"
        INSERT INTO daily_feedback (id, user_id, date, content, mood)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, date) DO UPDATE SET
            content = EXCLUDED.content,
            mood = EXCLUDED.mood,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(today)
    .bind(body.content.trim())
    .bind(body.mood)
    .fetch_one(&state.db)
    .await?;

    tracing::debug!(user_id = %auth_user.id, date = %today, "Daily feedback saved");

    Ok(Json(feedback))
}

/// Today's feedback, or `null` when nothing was recorded yet.
pub async fn get_today_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Option<DailyFeedback>>> {
    let feedback = sqlx::query_as::<_, DailyFeedback>(
        "SELECT * FROM daily_feedback WHERE user_id = $1 AND date = $2",
    )
    .bind(auth_user.id)
    .bind(Utc::now().date_naive())
    .fetch_optional(&state.db)
    .await?;

    Ok(Json(feedback))
}

pub async fn list_feedback(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<DailyFeedback>>> {
    let window = query
        .resolve(Utc::now().date_naive(), state.config.default_window_days)
        .map_err(AppError::Validation)?;

    let feedback = sqlx::query_as::<_, DailyFeedback>(
        r#"
        SELECT * FROM daily_feedback
        WHERE user_id = $1 AND date BETWEEN $2 AND $3
        ORDER BY date DESC
        "#,
    )
    .bind(auth_user.id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(feedback))
}
