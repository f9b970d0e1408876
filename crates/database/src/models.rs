//! Database row models.
//!
//! These mirror table shapes one-to-one; the store modules convert them
//! into the typed domain structs from `companion-core`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An engagement tracker row. Timestamps are RFC 3339 text, day stamps are
/// `YYYY-MM-DD` text, histories are JSON arrays of strings.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TrackerRow {
    pub user_id: String,
    pub last_active_at: String,
    pub total_sessions: i64,
    pub deep_study_count: i64,
    pub quick_ask_count: i64,
    pub emotional_tones: String,
    pub spiritual_themes: String,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub streak_broken_at: Option<String>,
    pub engagement_level: String,
    pub preferred_time_of_day: String,
}

/// A notification settings row for one (user, family) pair.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SettingsRow {
    pub user_id: String,
    pub family: String,
    pub morning_enabled: bool,
    pub midday_enabled: bool,
    pub afternoon_enabled: bool,
    pub evening_enabled: bool,
    pub daily_reflection_enabled: bool,
    pub suggestions_enabled: bool,
    pub weekly_summary_enabled: bool,
    pub monthly_report_enabled: bool,
    pub suggestion_frequency: String,
    pub weekly_summary_day: String,
    pub last_morning_sent: Option<String>,
    pub last_midday_sent: Option<String>,
    pub last_afternoon_sent: Option<String>,
    pub last_evening_sent: Option<String>,
    pub last_daily_reflection_sent: Option<String>,
    pub last_suggestion_sent: Option<String>,
    pub last_weekly_summary_sent: Option<String>,
    pub last_monthly_report_sent: Option<String>,
}

/// A delivered notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationRecord {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Recipient user ID.
    pub recipient: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Category slug (e.g. "morning", "weekly_summary").
    pub category: String,
    /// Sender family slug (e.g. "companion").
    pub family: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields for creating a notification record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub recipient: String,
    pub title: String,
    pub message: String,
    pub category: String,
    pub family: String,
}
