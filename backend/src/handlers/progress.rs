use axum::{
    extract::State,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::dto::{DailyProgressResponse, DateRangeQuery, HabitProgressResponse, ProgressQuery};
use crate::error::{AppError, AppResult};
use crate::extract::{Path, Query};
use crate::handlers::{fetch_active_habits, fetch_completed_entries, fetch_owned_habit, group_by_habit};
use crate::models::habit::Habit;
use crate::services::progress::{compute_daily_completion, summarize_habit, DateWindow};
use crate::AppState;

/// Streaks plus window completion for one habit.
pub async fn get_habit_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(habit_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<Json<HabitProgressResponse>> {
    query.validate()?;
    let window_days = query.days.unwrap_or(state.config.default_window_days);

    fetch_owned_habit(&state.db, habit_id, auth_user.id).await?;

    let now = Utc::now();
    let entries = fetch_completed_entries(&state.db, &[habit_id], None).await?;
    let summary = summarize_habit(&entries, &now, window_days);

    Ok(Json(HabitProgressResponse {
        habit_id,
        date: now.date_naive(),
        summary,
    }))
}

pub async fn get_today_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<DailyProgressResponse>> {
    let today = Utc::now().date_naive();
    let mut days = daily_progress(&state, auth_user.id, DateWindow::new(today, today)).await?;

    days.pop()
        .map(Json)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("empty progress for {}", today)))
}

/// Per-day completion across all active habits, oldest day first.
pub async fn get_daily_progress(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<DailyProgressResponse>>> {
    let window = query
        .resolve(Utc::now().date_naive(), 7)
        .map_err(AppError::Validation)?;

    let days = daily_progress(&state, auth_user.id, window).await?;
    Ok(Json(days))
}

async fn daily_progress(
    state: &AppState,
    user_id: Uuid,
    window: DateWindow,
) -> AppResult<Vec<DailyProgressResponse>> {
    let habits = fetch_active_habits(&state.db, user_id).await?;
    let habit_ids: Vec<Uuid> = habits.iter().map(|h| h.id).collect();
    let entries =
        fetch_completed_entries(&state.db, &habit_ids, Some((window.start, window.end))).await?;
    let snapshots = group_by_habit(&habits, entries);

    let days = window
        .iter_days()
        .map(|date| {
            let existing = habits_existing_on(&habits, date);
            let completion = compute_daily_completion(&snapshots[..existing], date);
            DailyProgressResponse {
                date,
                total_habits: completion.total_habits,
                completed_habits: completion.completed_habits,
                completion_rate: completion.completion_rate(),
            }
        })
        .collect();

    Ok(days)
}

/// Number of leading habits that already existed on `date`. `habits` must be
/// ordered by `created_at` ascending, as `fetch_active_habits` returns them.
fn habits_existing_on(habits: &[Habit], date: NaiveDate) -> usize {
    habits.partition_point(|habit| habit.created_at.date_naive() <= date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};

    use crate::models::habit::DEFAULT_HABIT_COLOR;

    fn habit_created(created_at: DateTime<Utc>) -> Habit {
        Habit {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Pack the bag the night before".into(),
            description: None,
            color: DEFAULT_HABIT_COLOR.into(),
            is_active: true,
            created_at,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn test_habits_count_from_their_creation_day() {
        let habits = vec![
            habit_created(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()),
            habit_created(Utc.with_ymd_and_hms(2026, 3, 3, 23, 30, 0).unwrap()),
            habit_created(Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap()),
        ];

        assert_eq!(habits_existing_on(&habits, day(1) - chrono::Days::new(1)), 0);
        assert_eq!(habits_existing_on(&habits, day(1)), 1);
        assert_eq!(habits_existing_on(&habits, day(2)), 1);
        assert_eq!(habits_existing_on(&habits, day(3)), 2);
        assert_eq!(habits_existing_on(&habits, day(5)), 3);
        assert_eq!(habits_existing_on(&habits, day(20)), 3);
    }

    #[test]
    fn test_later_habits_do_not_dilute_earlier_days() {
        let first = habit_created(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
        let second = habit_created(Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap());
        let habits = vec![first.clone(), second];
        let snapshots = group_by_habit(
            &habits,
            vec![crate::models::entry::HabitEntry {
                id: Uuid::new_v4(),
                habit_id: first.id,
                date: day(2),
                completed: true,
                notes: None,
            }],
        );

        let existing = habits_existing_on(&habits, day(2));
        let completion = compute_daily_completion(&snapshots[..existing], day(2));
        assert_eq!(completion.total_habits, 1);
        assert_eq!(completion.completion_rate(), 100);
    }
}
