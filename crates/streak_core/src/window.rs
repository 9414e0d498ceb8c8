use chrono::NaiveDate;
use serde::Serialize;

use crate::day::days_before;
use crate::ledger::{Ledger, Status};

/// Number of calendar days shown in the trailing window, today included.
pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct WindowDay {
    #[serde(serialize_with = "crate::day::serde_day::serialize")]
    pub date: NaiveDate,
    /// `None` when the ledger has no entry for `date`.
    pub status: Option<Status>,
}

/// The last `WINDOW_DAYS` days ending at `today`, oldest first, skipping days
/// before `start`.
pub fn select_window(ledger: &Ledger, start: NaiveDate, today: NaiveDate) -> Vec<WindowDay> {
    (0..WINDOW_DAYS)
        .rev()
        .filter_map(|offset| days_before(today, offset))
        .filter(|day| *day >= start)
        .map(|date| WindowDay {
            date,
            status: ledger.status(date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_ledger;
    use crate::toggle::toggle_day;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recent_start_limits_the_window() {
        let today = ymd(2024, 3, 10);
        let start = ymd(2024, 3, 8);
        let ledger = build_ledger(start, ymd(2024, 3, 31), today).ledger;

        let window = select_window(&ledger, start, today);
        let dates: Vec<_> = window.iter().map(|entry| entry.date).collect();
        assert_eq!(dates, vec![ymd(2024, 3, 8), ymd(2024, 3, 9), today]);
    }

    #[test]
    fn full_window_is_oldest_first() {
        let today = ymd(2024, 3, 10);
        let start = ymd(2024, 1, 1);
        let ledger = build_ledger(start, ymd(2024, 12, 31), today).ledger;
        let ledger = toggle_day(ledger, ymd(2024, 3, 4));

        let window = select_window(&ledger, start, today);
        assert_eq!(window.len(), 7);
        assert_eq!(window[0].date, ymd(2024, 3, 4));
        assert_eq!(window[0].status, Some(Status::Done));
        assert_eq!(window[6].date, today);
        assert_eq!(window[6].status, Some(Status::None));
    }

    #[test]
    fn reports_absence_for_days_past_the_end() {
        let today = ymd(2024, 3, 10);
        let start = ymd(2024, 3, 1);
        let ledger = build_ledger(start, ymd(2024, 3, 8), today).ledger;

        let window = select_window(&ledger, start, today);
        assert_eq!(window.len(), 7);
        assert_eq!(window[5].status, None);
        assert_eq!(window[6].status, None);
        assert_eq!(window[4].status, Some(Status::None));
    }

    #[test]
    fn future_start_gives_an_empty_window() {
        let today = ymd(2024, 3, 10);
        let start = ymd(2024, 3, 11);
        let ledger = build_ledger(start, ymd(2024, 3, 20), today).ledger;
        assert!(select_window(&ledger, start, today).is_empty());
    }

    #[test]
    fn window_never_exceeds_seven_or_precedes_start() {
        let today = ymd(2024, 6, 15);
        for back in 0..20 {
            let start = days_before(today, back).unwrap();
            let ledger = build_ledger(start, today, today).ledger;
            let window = select_window(&ledger, start, today);
            assert!(window.len() <= 7);
            assert_eq!(window.len() as i64, (back + 1).min(WINDOW_DAYS));
            assert!(window.iter().all(|entry| entry.date >= start));
        }
    }
}
