//! Send-day gate.
//!
//! The newsletter goes out once a week. On any other day the binary exits
//! quietly unless invoked with the force flag; there is no catch-up for
//! missed runs.

use chrono::Weekday;

/// Day of week the digest is dispatched.
pub const SEND_DAY: Weekday = Weekday::Sat;

/// Whether a run should proceed today.
#[must_use]
pub fn should_run(force: bool, today: Weekday) -> bool {
    force || today == SEND_DAY
}
