use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use streak_core::{
    build_ledger, compute_streaks, select_window, toggle_day, Ledger, StreakMetrics, WindowDay,
};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct HabitId(Uuid);

impl HabitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies whose habits an operation acts on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields supplied when a habit is created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewHabit {
    pub name: String,
    #[serde(with = "streak_core::day::serde_day")]
    pub start_date: NaiveDate,
    #[serde(with = "streak_core::day::serde_day")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Habit {
    pub id: HabitId,
    pub owner: OwnerId,
    pub name: String,
    #[serde(with = "streak_core::day::serde_day")]
    pub start_date: NaiveDate,
    #[serde(with = "streak_core::day::serde_day")]
    pub end_date: NaiveDate,
    pub ledger: Ledger,
    pub current_streak: u32,
    pub best_streak: u32,
    pub success_days: u32,
    pub total_tracked_days: i64,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn create(owner: OwnerId, fields: NewHabit, today: NaiveDate) -> Self {
        let built = build_ledger(fields.start_date, fields.end_date, today);
        Self {
            id: HabitId::new(),
            owner,
            name: fields.name,
            start_date: fields.start_date,
            end_date: fields.end_date,
            ledger: built.ledger,
            current_streak: 0,
            best_streak: 0,
            success_days: 0,
            total_tracked_days: built.total_tracked_days,
            created_at: Utc::now(),
        }
    }

    /// Toggles `day` and recomputes every metric from the whole ledger.
    pub fn toggle(&mut self, day: NaiveDate, today: NaiveDate) -> StreakMetrics {
        let ledger = std::mem::take(&mut self.ledger);
        self.ledger = toggle_day(ledger, day);
        let metrics = compute_streaks(&self.ledger, today);
        self.apply_metrics(metrics);
        metrics
    }

    pub fn apply_metrics(&mut self, metrics: StreakMetrics) {
        self.current_streak = metrics.current_streak;
        self.best_streak = metrics.best_streak;
        self.success_days = metrics.success_days;
        self.total_tracked_days = i64::from(metrics.total_tracked_days);
    }

    pub fn window(&self, today: NaiveDate) -> Vec<WindowDay> {
        select_window(&self.ledger, self.start_date, today)
    }
}

/// A habit together with its trailing window, ready for display.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HabitDetail {
    pub habit: Habit,
    pub last_days: Vec<WindowDay>,
}
