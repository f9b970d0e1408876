//! Notification eligibility rules.
//!
//! Pure over a settings snapshot and "today"; a malformed record makes its
//! category ineligible rather than erroring, so one bad row cannot abort a
//! dispatch run. The monthly report additionally requires recent activity,
//! which the dispatcher checks with [`recent_activity`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock;
use crate::settings::NotificationSettings;

/// A notification category a dispatch run can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Morning mindset push.
    Morning,
    /// Midday reset push.
    Midday,
    /// Afternoon pause push.
    Afternoon,
    /// Evening wind-down push.
    Evening,
    /// Daily reflection prompt.
    DailyReflection,
    /// Proactive suggestion, sent on a configurable cadence.
    Suggestion,
    /// Weekly growth summary, sent on a configured weekday.
    WeeklySummary,
    /// Monthly progress report, sent on the first of the month.
    MonthlyReport,
}

impl NotificationCategory {
    /// All categories, in dispatch order.
    pub const ALL: [NotificationCategory; 8] = [
        NotificationCategory::Morning,
        NotificationCategory::Midday,
        NotificationCategory::Afternoon,
        NotificationCategory::Evening,
        NotificationCategory::DailyReflection,
        NotificationCategory::Suggestion,
        NotificationCategory::WeeklySummary,
        NotificationCategory::MonthlyReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Morning => "morning",
            NotificationCategory::Midday => "midday",
            NotificationCategory::Afternoon => "afternoon",
            NotificationCategory::Evening => "evening",
            NotificationCategory::DailyReflection => "daily_reflection",
            NotificationCategory::Suggestion => "suggestion",
            NotificationCategory::WeeklySummary => "weekly_summary",
            NotificationCategory::MonthlyReport => "monthly_report",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(NotificationCategory::Morning),
            "midday" => Some(NotificationCategory::Midday),
            "afternoon" => Some(NotificationCategory::Afternoon),
            "evening" => Some(NotificationCategory::Evening),
            "daily_reflection" => Some(NotificationCategory::DailyReflection),
            "suggestion" => Some(NotificationCategory::Suggestion),
            "weekly_summary" => Some(NotificationCategory::WeeklySummary),
            "monthly_report" => Some(NotificationCategory::MonthlyReport),
            _ => None,
        }
    }

    /// Whether this category is additionally gated on recent user activity.
    ///
    /// Only the monthly report is: a user with no activity in the trailing
    /// window has nothing to report on and is skipped.
    pub fn requires_recent_activity(&self) -> bool {
        matches!(self, NotificationCategory::MonthlyReport)
    }
}

/// Decide whether `category` may fire for this settings record on `today`.
///
/// Settings-only decision; the monthly activity gate is separate (see
/// [`recent_activity`]). Never panics on malformed records.
pub fn is_eligible(
    settings: &NotificationSettings,
    category: NotificationCategory,
    today: NaiveDate,
) -> bool {
    if !settings.enabled(category) {
        return false;
    }
    let last_sent = settings.last_sent(category);

    match category {
        NotificationCategory::Morning
        | NotificationCategory::Midday
        | NotificationCategory::Afternoon
        | NotificationCategory::Evening
        | NotificationCategory::DailyReflection => last_sent != Some(today),

        NotificationCategory::Suggestion => {
            let Some(frequency) = settings.suggestion_frequency else {
                // Malformed or missing cadence: fail closed.
                return false;
            };
            match last_sent {
                None => true,
                Some(sent) => clock::days_between(sent, today) >= frequency.required_days(),
            }
        }

        NotificationCategory::WeeklySummary => {
            let Some(day) = settings.weekly_summary_day else {
                return false;
            };
            clock::weekday_index(today) == day.weekday_index() && last_sent != Some(today)
        }

        NotificationCategory::MonthlyReport => {
            clock::is_first_of_month(today) && last_sent != Some(today)
        }
    }
}

/// Whether a user counts as active within the trailing window.
///
/// `last_active_day` is the day of the user's most recent activity event;
/// `None` (no tracker) means no activity at all.
pub fn recent_activity(
    last_active_day: Option<NaiveDate>,
    today: NaiveDate,
    window_days: i64,
) -> bool {
    match last_active_day {
        None => false,
        Some(day) => {
            let gap = clock::days_between(day, today);
            (0..=window_days).contains(&gap)
        }
    }
}
