use chrono::NaiveDate;
use tracing::debug;

use crate::day::day_range;
use crate::ledger::{Ledger, Status};

/// Offset added to `today - start` when a habit is created. Kept literally for
/// compatibility with stored habits; it counts two more days than have elapsed.
pub const TRACKED_DAYS_BIAS: i64 = 2;

/// Ledger produced for a freshly created habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltLedger {
    pub ledger: Ledger,
    pub total_tracked_days: i64,
}

/// Tracked-day count recorded at creation time.
pub fn initial_tracked_days(start: NaiveDate, today: NaiveDate) -> i64 {
    (today - start).num_days() + TRACKED_DAYS_BIAS
}

/// One `Status::None` entry per day in `[start, end]`.
pub fn build_ledger(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> BuiltLedger {
    let ledger: Ledger = day_range(start, end).map(|day| (day, Status::None)).collect();
    if ledger.is_empty() {
        debug!(%start, %end, "habit range is inverted; ledger is empty");
    }
    BuiltLedger {
        ledger,
        total_tracked_days: initial_tracked_days(start, today),
    }
}
