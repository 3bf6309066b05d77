//! Wall-clock source for record timestamps.

use chrono::{Local, NaiveDateTime, SubsecRound};

/// Current local time at microsecond precision.
///
/// Postgres `TIMESTAMP` keeps microseconds, so truncating here makes a freshly
/// written record compare equal to the same record read back.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(6)
}
