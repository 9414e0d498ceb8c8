use chrono::NaiveDate;
use tracing::debug;

use crate::ledger::Ledger;

/// Advances the status of `day` one step through the cycle. A day with no
/// entry is treated as `Status::None` and gets inserted.
pub fn toggle_day(mut ledger: Ledger, day: NaiveDate) -> Ledger {
    let current = ledger.status(day);
    if current.is_none() {
        debug!(%day, "toggling a day outside the ledger range");
    }
    ledger.set(day, current.unwrap_or_default().next());
    ledger
}
