//! Consecutive-day activity streak computation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock;

/// A user's activity streak state.
///
/// `current` counts consecutive days with at least one activity event;
/// `longest` is its historical maximum. Both are at least 1 once a tracker
/// exists. `broken_at` records the most recent day a streak reset to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    /// Consecutive days with at least one activity event.
    pub current: u32,
    /// Historical maximum of `current`.
    pub longest: u32,
    /// The last day on which the streak reset, if any.
    pub broken_at: Option<NaiveDate>,
}

impl Streak {
    /// The streak for a user's very first activity event.
    pub fn new() -> Self {
        Self {
            current: 1,
            longest: 1,
            broken_at: None,
        }
    }

    /// Advance the streak for an activity event on `today`, given the day
    /// of the previous event.
    ///
    /// - Same day: unchanged (multiple events within a day count once).
    /// - Exactly one day later: the streak grows by one.
    /// - More than one day later: the streak resets to 1 and `broken_at`
    ///   records `today`.
    /// - `today` before the last active day (clock skew, out-of-order
    ///   event): treated the same as a same-day event.
    pub fn advance(&self, last_active_day: NaiveDate, today: NaiveDate) -> Streak {
        let gap = clock::days_between(last_active_day, today);

        let mut next = *self;
        if gap == 1 {
            next.current += 1;
        } else if gap > 1 {
            next.current = 1;
            next.broken_at = Some(today);
        }
        next.longest = next.longest.max(next.current);
        next
    }
}

impl Default for Streak {
    fn default() -> Self {
        Self::new()
    }
}
