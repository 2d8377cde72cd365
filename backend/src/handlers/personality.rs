use axum::{extract::State, Extension, Json};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::dto::{PersonalityTestRequest, PersonalityTestResponse};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::models::personality::PersonalityTestResult;
use crate::AppState;

/// Records a quiz outcome and makes it the user's current personality type.
pub async fn save_personality_test(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(body): JsonBody<PersonalityTestRequest>,
) -> AppResult<Json<PersonalityTestResponse>> {
    let personality = body.personality;
    let mut tx = state.db.begin().await?;

    let updated = sqlx::query("UPDATE users SET personality_type = $2 WHERE id = $1")
        .bind(auth_user.id)
        .bind(personality.as_str())
        .execute(&mut *tx)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".into()));
    }

    let result = sqlx::query_as::<_, PersonalityTestResult>(
        r#"
        INSERT INTO personality_test_results (id, user_id, personality, answers)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(auth_user.id)
    .bind(personality.as_str())
    .bind(serde_json::Value::Object(body.answers))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %auth_user.id,
        personality = personality.as_str(),
        "Personality test saved"
    );

    Ok(Json(PersonalityTestResponse {
        id: result.id,
        personality,
        title: personality.title().to_string(),
        strategy: personality.strategy().to_string(),
    }))
}
