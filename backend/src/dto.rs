//! # Unlate — Request/Response DTOs
//!
//! API contract types shared by the handlers.
//!
//! Conventions:
//! - `*Request` / `*Query` → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field rules are expressed via `validator` derive macros; handlers call
//!   `validate()` before touching storage

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::personality::PersonalityType;
use crate::services::progress::{DateWindow, HabitSummary};

/// Longest range any list or progress endpoint will scan.
pub const MAX_WINDOW_DAYS: u32 = 366;

// ============================================================================
// Habits
// ============================================================================

/// POST /api/habits
#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom = "validate_not_blank")]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be under 2000 characters"))]
    pub description: Option<String>,

    /// Hex color code (e.g., "#3B82F6"). Default: "#3B82F6"
    #[validate(custom = "validate_color")]
    pub color: Option<String>,
}

/// PUT /api/habits/{id} — partial update, all fields optional
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    #[validate(custom = "validate_not_blank")]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be under 2000 characters"))]
    pub description: Option<String>,

    #[validate(custom = "validate_color")]
    pub color: Option<String>,

    /// `false` soft-retires the habit, `true` brings it back
    pub is_active: Option<bool>,
}

// ============================================================================
// Entries
// ============================================================================

/// POST /api/habits/{id}/toggle query params
#[derive(Debug, Default, Deserialize)]
pub struct ToggleQuery {
    /// Day to toggle. Default: today. Must be within ±1 day of today.
    pub date: Option<NaiveDate>,
}

impl ToggleQuery {
    pub fn resolve_date(&self, today: NaiveDate) -> Result<NaiveDate, String> {
        let date = self.date.unwrap_or(today);
        let diff = (date - today).num_days().abs();
        if diff > 1 {
            return Err("Date must be within ±1 day of today".into());
        }
        Ok(date)
    }
}

/// PUT /api/habits/{id}/entries/{date}/notes — `null` clears the notes
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNotesRequest {
    #[validate(length(max = 2000, message = "Notes must be under 2000 characters"))]
    pub notes: Option<String>,
}

// ============================================================================
// Ranges & progress
// ============================================================================

/// `start_date` / `end_date` query params shared by list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRangeQuery {
    /// Missing bounds default to the `default_days` days ending today.
    pub fn resolve(&self, today: NaiveDate, default_days: u32) -> Result<DateWindow, String> {
        let end = self.end_date.unwrap_or(today);
        let start = self
            .start_date
            .unwrap_or_else(|| DateWindow::ending_at(end, default_days).start);

        if start > end {
            return Err("start_date must not be after end_date".into());
        }
        let window = DateWindow::new(start, end);
        if window.days() > MAX_WINDOW_DAYS {
            return Err(format!("Date range must span at most {} days", MAX_WINDOW_DAYS));
        }
        Ok(window)
    }
}

/// GET /api/habits/{id}/progress query params
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProgressQuery {
    #[validate(range(min = 1, max = 366, message = "days must be 1-366"))]
    pub days: Option<u32>,
}

/// GET /api/habits/{id}/progress
#[derive(Debug, Serialize)]
pub struct HabitProgressResponse {
    pub habit_id: Uuid,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub summary: HabitSummary,
}

/// GET /api/progress/today and each row of GET /api/progress/daily
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DailyProgressResponse {
    pub date: NaiveDate,
    pub total_habits: u32,
    pub completed_habits: u32,
    pub completion_rate: u64,
}

// ============================================================================
// Feedback
// ============================================================================

/// POST /api/feedback — upserts today's reflection
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertFeedbackRequest {
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    #[validate(custom = "validate_not_blank")]
    pub content: String,

    /// Mood score 1-5 (1=very bad, 5=very good)
    #[validate(range(min = 1, max = 5, message = "Mood must be 1-5"))]
    pub mood: Option<i32>,
}

// ============================================================================
// Personality quiz
// ============================================================================

/// POST /api/personality-test
#[derive(Debug, Deserialize)]
pub struct PersonalityTestRequest {
    pub personality: PersonalityType,
    /// Raw answers keyed by question id
    #[serde(default)]
    pub answers: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PersonalityTestResponse {
    pub id: Uuid,
    pub personality: PersonalityType,
    pub title: String,
    pub strategy: String,
}

// ============================================================================
// System
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: &'static str,
    pub checks: ReadyzChecks,
    pub pool: PoolStats,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub database: bool,
}

#[derive(Debug, Serialize)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn validate_color(value: &str) -> Result<(), ValidationError> {
    let hex = value.strip_prefix('#').unwrap_or("");
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut err = ValidationError::new("color");
        err.message = Some("Color must be a hex code like #3B82F6".into());
        return Err(err);
    }
    Ok(())
}
