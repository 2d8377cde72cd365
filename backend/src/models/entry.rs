use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::progress::CompletionMark;

/// Completion state of one habit on one calendar day. `(habit_id, date)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HabitEntry {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
    pub notes: Option<String>,
}

impl CompletionMark for HabitEntry {
    fn day(&self) -> NaiveDate {
        self.date
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}
