//! Per-user notification settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::eligibility::NotificationCategory;

/// The notification family a settings record belongs to.
///
/// Each family is an independent sender persona with its own settings row
/// per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationFamily {
    /// The main companion persona.
    Companion,
    /// Meal and nutrition suggestions.
    Nutrition,
    /// Fitness coaching.
    Coaching,
}

impl NotificationFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationFamily::Companion => "companion",
            NotificationFamily::Nutrition => "nutrition",
            NotificationFamily::Coaching => "coaching",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "companion" => Some(NotificationFamily::Companion),
            "nutrition" => Some(NotificationFamily::Nutrition),
            "coaching" => Some(NotificationFamily::Coaching),
            _ => None,
        }
    }
}

/// How often proactive suggestions may be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionFrequency {
    Daily,
    EveryThreeDays,
    Weekly,
}

impl SuggestionFrequency {
    /// Minimum whole days that must elapse between sends.
    pub fn required_days(&self) -> i64 {
        match self {
            SuggestionFrequency::Daily => 1,
            SuggestionFrequency::EveryThreeDays => 3,
            SuggestionFrequency::Weekly => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionFrequency::Daily => "daily",
            SuggestionFrequency::EveryThreeDays => "every_3_days",
            SuggestionFrequency::Weekly => "weekly",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(SuggestionFrequency::Daily),
            "every_3_days" => Some(SuggestionFrequency::EveryThreeDays),
            "weekly" => Some(SuggestionFrequency::Weekly),
            _ => None,
        }
    }
}

/// Which weekday the weekly growth summary goes out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryDay {
    SundayEvening,
    MondayMorning,
}

impl SummaryDay {
    /// Weekday index (0 = Sunday) this summary day matches.
    pub fn weekday_index(&self) -> u8 {
        match self {
            SummaryDay::SundayEvening => 0,
            SummaryDay::MondayMorning => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryDay::SundayEvening => "sunday_evening",
            SummaryDay::MondayMorning => "monday_morning",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sunday_evening" => Some(SummaryDay::SundayEvening),
            "monday_morning" => Some(SummaryDay::MondayMorning),
            _ => None,
        }
    }
}

/// Per-user, per-family notification settings.
///
/// Cadence fields are `None` when the stored value was missing or did not
/// parse; eligibility fails closed on `None` rather than erroring, so one
/// bad record cannot take down a dispatch run.
///
/// `last_*_sent` stamps are `None` until the first successful send. An
/// absent stamp always means "eligible" for cadence-based categories;
/// absence is represented explicitly, never with a sentinel date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    pub user_id: String,
    pub family: NotificationFamily,

    pub morning_enabled: bool,
    pub midday_enabled: bool,
    pub afternoon_enabled: bool,
    pub evening_enabled: bool,
    pub daily_reflection_enabled: bool,
    pub suggestions_enabled: bool,
    pub weekly_summary_enabled: bool,
    pub monthly_report_enabled: bool,

    pub suggestion_frequency: Option<SuggestionFrequency>,
    pub weekly_summary_day: Option<SummaryDay>,

    pub last_morning_sent: Option<NaiveDate>,
    pub last_midday_sent: Option<NaiveDate>,
    pub last_afternoon_sent: Option<NaiveDate>,
    pub last_evening_sent: Option<NaiveDate>,
    pub last_daily_reflection_sent: Option<NaiveDate>,
    pub last_suggestion_sent: Option<NaiveDate>,
    pub last_weekly_summary_sent: Option<NaiveDate>,
    pub last_monthly_report_sent: Option<NaiveDate>,
}

impl NotificationSettings {
    /// The settings a user starts with when their record is created lazily
    /// on first fetch.
    pub fn defaults(user_id: impl Into<String>, family: NotificationFamily) -> Self {
        Self {
            user_id: user_id.into(),
            family,
            morning_enabled: true,
            midday_enabled: false,
            afternoon_enabled: false,
            evening_enabled: false,
            daily_reflection_enabled: true,
            suggestions_enabled: true,
            weekly_summary_enabled: true,
            monthly_report_enabled: true,
            suggestion_frequency: Some(SuggestionFrequency::Daily),
            weekly_summary_day: Some(SummaryDay::SundayEvening),
            last_morning_sent: None,
            last_midday_sent: None,
            last_afternoon_sent: None,
            last_evening_sent: None,
            last_daily_reflection_sent: None,
            last_suggestion_sent: None,
            last_weekly_summary_sent: None,
            last_monthly_report_sent: None,
        }
    }

    /// Whether a category is enabled on this record.
    pub fn enabled(&self, category: NotificationCategory) -> bool {
        match category {
            NotificationCategory::Morning => self.morning_enabled,
            NotificationCategory::Midday => self.midday_enabled,
            NotificationCategory::Afternoon => self.afternoon_enabled,
            NotificationCategory::Evening => self.evening_enabled,
            NotificationCategory::DailyReflection => self.daily_reflection_enabled,
            NotificationCategory::Suggestion => self.suggestions_enabled,
            NotificationCategory::WeeklySummary => self.weekly_summary_enabled,
            NotificationCategory::MonthlyReport => self.monthly_report_enabled,
        }
    }

    /// Enable or disable a category.
    pub fn set_enabled(&mut self, category: NotificationCategory, enabled: bool) {
        match category {
            NotificationCategory::Morning => self.morning_enabled = enabled,
            NotificationCategory::Midday => self.midday_enabled = enabled,
            NotificationCategory::Afternoon => self.afternoon_enabled = enabled,
            NotificationCategory::Evening => self.evening_enabled = enabled,
            NotificationCategory::DailyReflection => self.daily_reflection_enabled = enabled,
            NotificationCategory::Suggestion => self.suggestions_enabled = enabled,
            NotificationCategory::WeeklySummary => self.weekly_summary_enabled = enabled,
            NotificationCategory::MonthlyReport => self.monthly_report_enabled = enabled,
        }
    }

    /// The day a category last successfully sent, if ever.
    pub fn last_sent(&self, category: NotificationCategory) -> Option<NaiveDate> {
        match category {
            NotificationCategory::Morning => self.last_morning_sent,
            NotificationCategory::Midday => self.last_midday_sent,
            NotificationCategory::Afternoon => self.last_afternoon_sent,
            NotificationCategory::Evening => self.last_evening_sent,
            NotificationCategory::DailyReflection => self.last_daily_reflection_sent,
            NotificationCategory::Suggestion => self.last_suggestion_sent,
            NotificationCategory::WeeklySummary => self.last_weekly_summary_sent,
            NotificationCategory::MonthlyReport => self.last_monthly_report_sent,
        }
    }

    /// Record a successful send day for a category.
    pub fn set_last_sent(&mut self, category: NotificationCategory, day: NaiveDate) {
        match category {
            NotificationCategory::Morning => self.last_morning_sent = Some(day),
            NotificationCategory::Midday => self.last_midday_sent = Some(day),
            NotificationCategory::Afternoon => self.last_afternoon_sent = Some(day),
            NotificationCategory::Evening => self.last_evening_sent = Some(day),
            NotificationCategory::DailyReflection => self.last_daily_reflection_sent = Some(day),
            NotificationCategory::Suggestion => self.last_suggestion_sent = Some(day),
            NotificationCategory::WeeklySummary => self.last_weekly_summary_sent = Some(day),
            NotificationCategory::MonthlyReport => self.last_monthly_report_sent = Some(day),
        }
    }
}
