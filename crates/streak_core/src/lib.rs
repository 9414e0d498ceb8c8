pub mod builder;
pub mod day;
pub mod ledger;
pub mod streak;
pub mod toggle;
pub mod window;

pub use crate::builder::{build_ledger, BuiltLedger, TRACKED_DAYS_BIAS};
pub use crate::ledger::{Ledger, Status};
pub use crate::streak::{compute_streaks, StreakMetrics};
pub use crate::toggle::toggle_day;
pub use crate::window::{select_window, WindowDay};
