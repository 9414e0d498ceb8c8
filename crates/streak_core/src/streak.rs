use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreakMetrics {
    pub current_streak: u32,
    pub best_streak: u32,
    pub success_days: u32,
    pub total_tracked_days: u32,
}

/// Recomputes all metrics from the start of the ledger.
///
/// Entries are walked in chronological order and the walk ends right after
/// `today` is processed. When `today` has no entry every entry is visited, so
/// the current streak reflects the tail of the ledger.
pub fn compute_streaks(ledger: &Ledger, today: NaiveDate) -> StreakMetrics {
    let mut metrics = StreakMetrics::default();

    for (day, status) in ledger.iter() {
        metrics.total_tracked_days += 1;
        if status.is_done() {
            metrics.current_streak += 1;
            metrics.success_days += 1;
            metrics.best_streak = metrics.best_streak.max(metrics.current_streak);
        } else {
            metrics.current_streak = 0;
        }
        if day == today {
            break;
        }
    }

    metrics
}
