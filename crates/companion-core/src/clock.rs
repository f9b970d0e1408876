//! Calendar-day helpers.
//!
//! All day math in the service runs in UTC. A "day key" is the calendar
//! date a timestamp falls on; streaks and send stamps compare day keys,
//! never raw timestamps.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Truncate a timestamp to its UTC calendar day.
pub fn day_key(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Signed whole-day difference from `a` to `b`.
///
/// Positive when `b` is after `a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

/// Whether a date is the first day of its month.
pub fn is_first_of_month(d: NaiveDate) -> bool {
    d.day() == 1
}

/// Weekday index with 0 = Sunday, 6 = Saturday.
///
/// This is the convention the weekly-summary day settings use.
pub fn weekday_index(d: NaiveDate) -> u8 {
    d.weekday().num_days_from_sunday() as u8
}
