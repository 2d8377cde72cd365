//! # Progress engine
//!
//! Pure derivation of habit progress from entry snapshots: daily completion
//! counts, completion-rate percentages and streaks.
//!
//! Nothing in here touches the database or the system clock. Handlers load
//! rows, read `Utc::now()` once, and hand both in. Every function is total:
//! empty inputs and zero totals produce zeros rather than errors.
//!
//! Streak policy: the calendar day of the reference instant (the *anchor*)
//! is still open until it ends. If it has no completed entry yet, the walk
//! starts from the previous day, so a run ending yesterday keeps its length.

use std::collections::BTreeSet;

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anything that records whether a habit was completed on a calendar day.
pub trait CompletionMark {
    fn day(&self) -> NaiveDate;
    fn is_completed(&self) -> bool;
}

/// Bare `{date, completed}` pair, for callers that don't hold full entry rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMark {
    pub date: NaiveDate,
    pub completed: bool,
}

impl CompletionMark for DayMark {
    fn day(&self) -> NaiveDate {
        self.date
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}

impl<M: CompletionMark> CompletionMark for &M {
    fn day(&self) -> NaiveDate {
        (**self).day()
    }

    fn is_completed(&self) -> bool {
        (**self).is_completed()
    }
}

/// One habit together with the entries the caller loaded for it.
#[derive(Debug, Clone)]
pub struct HabitSnapshot<E> {
    pub habit_id: Uuid,
    pub entries: Vec<E>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyCompletion {
    pub total_habits: u32,
    pub completed_habits: u32,
}

impl DailyCompletion {
    pub fn completion_rate(&self) -> u64 {
        compute_completion_rate(self.completed_habits, self.total_habits)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` days ending at (and including) `end`. Always at least one day.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let back = Days::new(u64::from(days.max(1) - 1));
        let start = end.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn days(&self) -> u32 {
        if self.end < self.start {
            return 0;
        }
        saturating_u32((self.end - self.start).num_days() + 1)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days() as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowCompletion {
    pub window: DateWindow,
    pub completed_days: u32,
    pub total_days: u32,
    pub completion_rate: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: bool,
    pub window: WindowCompletion,
}

/// Counts the habits with at least one completed entry dated `day`.
pub fn compute_daily_completion<E: CompletionMark>(
    habits: &[HabitSnapshot<E>],
    day: NaiveDate,
) -> DailyCompletion {
    let completed = habits
        .iter()
        .filter(|habit| is_completed_on(&habit.entries, day))
        .count();

    DailyCompletion {
        total_habits: saturating_u32(habits.len()),
        completed_habits: saturating_u32(completed),
    }
}

/// Integer percentage, rounded half-up. Zero when `total` is zero.
///
/// The inputs are not cross-checked: `completed > total` yields more than 100.
pub fn compute_completion_rate(completed: u32, total: u32) -> u64 {
    if total == 0 {
        return 0;
    }
    let (completed, total) = (u64::from(completed), u64::from(total));
    (completed * 100 + total / 2) / total
}

/// Consecutive completed days ending at the anchor day of `reference`
/// (or the day before it while the anchor is still open).
pub fn compute_streak<E, Tz>(entries: &[E], reference: &DateTime<Tz>) -> u32
where
    E: CompletionMark,
    Tz: TimeZone,
{
    let anchor = reference.date_naive();
    let days = completed_days(entries);

    let mut cursor = if days.contains(&anchor) {
        anchor
    } else {
        match anchor.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    for &day in days.range(..=cursor).rev() {
        if day != cursor {
            break;
        }
        streak += 1;
        match cursor.pred_opt() {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    streak
}

/// Longest run of consecutive completed days anywhere in the history.
pub fn compute_longest_streak<E: CompletionMark>(entries: &[E]) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in completed_days(entries) {
        run = match previous.and_then(|p| p.succ_opt()) {
            Some(next) if next == day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

/// Distinct completed days of one habit inside `window`.
pub fn compute_window_completion<E: CompletionMark>(
    entries: &[E],
    window: DateWindow,
) -> WindowCompletion {
    let completed_days = if window.days() == 0 {
        0
    } else {
        saturating_u32(completed_days(entries).range(window.start..=window.end).count())
    };
    let total_days = window.days();

    WindowCompletion {
        window,
        completed_days,
        total_days,
        completion_rate: compute_completion_rate(completed_days, total_days),
    }
}

pub fn summarize_habit<E, Tz>(entries: &[E], reference: &DateTime<Tz>, window_days: u32) -> HabitSummary
where
    E: CompletionMark,
    Tz: TimeZone,
{
    let anchor = reference.date_naive();
    HabitSummary {
        current_streak: compute_streak(entries, reference),
        longest_streak: compute_longest_streak(entries),
        completed_today: is_completed_on(entries, anchor),
        window: compute_window_completion(entries, DateWindow::ending_at(anchor, window_days)),
    }
}

pub fn is_completed_on<E: CompletionMark>(entries: &[E], day: NaiveDate) -> bool {
    entries
        .iter()
        .any(|entry| entry.is_completed() && entry.day() == day)
}

fn completed_days<E: CompletionMark>(entries: &[E]) -> BTreeSet<NaiveDate> {
    entries
        .iter()
        .filter(|entry| entry.is_completed())
        .map(|entry| entry.day())
        .collect()
}

fn saturating_u32<N: TryInto<u32>>(n: N) -> u32 {
    n.try_into().unwrap_or(u32::MAX)
}
