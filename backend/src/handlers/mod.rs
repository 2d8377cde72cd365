pub mod entries;
pub mod feedback;
pub mod habits;
pub mod health;
pub mod personality;
pub mod progress;

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{entry::HabitEntry, habit::Habit};
use crate::services::progress::HabitSnapshot;

/// Loads a habit only if `user_id` owns it; anyone else's habit is "not found".
pub(crate) async fn fetch_owned_habit(db: &PgPool, habit_id: Uuid, user_id: Uuid) -> AppResult<Habit> {
    sqlx::query_as::<_, Habit>("SELECT * FROM habits WHERE id = $1 AND user_id = $2")
        .bind(habit_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Habit not found".into()))
}

pub(crate) async fn fetch_active_habits(db: &PgPool, user_id: Uuid) -> AppResult<Vec<Habit>> {
    let habits = sqlx::query_as::<_, Habit>(
        r#"
        SELECT * FROM habits
        WHERE user_id = $1 AND is_active = true
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    Ok(habits)
}

/// Completed entries of the given habits, optionally bounded to `[start, end]`.
pub(crate) async fn fetch_completed_entries(
    db: &PgPool,
    habit_ids: &[Uuid],
    range: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<Vec<HabitEntry>> {
    if habit_ids.is_empty() {
        return Ok(Vec::new());
    }

    let entries = match range {
        Some((start, end)) => {
            sqlx::query_as::<_, HabitEntry>(
                r#"
                SELECT * FROM habit_entries
                WHERE habit_id = ANY($1) AND completed = true AND date BETWEEN $2 AND $3
                ORDER BY date DESC
                "#,
            )
            .bind(habit_ids)
            .bind(start)
            .bind(end)
            .fetch_all(db)
            .await?
        }
        None => {
            sqlx::query_as::<_, HabitEntry>(
                r#"
                SELECT * FROM habit_entries
                WHERE habit_id = ANY($1) AND completed = true
                ORDER BY date DESC
                "#,
            )
            .bind(habit_ids)
            .fetch_all(db)
            .await?
        }
    };

    Ok(entries)
}

/// Groups entries under their habit, preserving habit order. Habits with no
/// entries still get an (empty) snapshot.
pub(crate) fn group_by_habit(habits: &[Habit], entries: Vec<HabitEntry>) -> Vec<HabitSnapshot<HabitEntry>> {
    let mut by_habit: HashMap<Uuid, Vec<HabitEntry>> = HashMap::new();
    for entry in entries {
        by_habit.entry(entry.habit_id).or_default().push(entry);
    }

    habits
        .iter()
        .map(|habit| HabitSnapshot {
            habit_id: habit.id,
            entries: by_habit.remove(&habit.id).unwrap_or_default(),
        })
        .collect()
}
