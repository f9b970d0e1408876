//! Engagement level and time-of-day classification.
//!
//! The thresholds here have no empirical backing in the product; they are
//! kept as configuration with the observed constants as defaults so a
//! deployment can tune them without a code change.

use serde::{Deserialize, Serialize};

/// How engaged a user is, derived from their total session count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementLevel {
    Low,
    Moderate,
    High,
}

impl EngagementLevel {
    /// Stable string form used in storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementLevel::Low => "low",
            EngagementLevel::Moderate => "moderate",
            EngagementLevel::High => "high",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(EngagementLevel::Low),
            "moderate" => Some(EngagementLevel::Moderate),
            "high" => Some(EngagementLevel::High),
            _ => None,
        }
    }
}

/// The part of day a user most recently tends to be active in.
///
/// Last-write-wins from the hour of the most recent activity event, not a
/// distribution over history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Midday,
    Evening,
    Unset,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Midday => "midday",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Unset => "unset",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(TimeOfDay::Morning),
            "midday" => Some(TimeOfDay::Midday),
            "evening" => Some(TimeOfDay::Evening),
            "unset" => Some(TimeOfDay::Unset),
            _ => None,
        }
    }
}

/// Thresholds for engagement classification and time-of-day bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Session counts strictly below this classify as low.
    pub low_max_sessions: u32,
    /// Session counts strictly below this (and not low) classify as moderate.
    pub moderate_max_sessions: u32,
    /// Hour (inclusive) at which the morning bucket begins.
    pub morning_start_hour: u32,
    /// Hour (inclusive) at which the midday bucket begins.
    pub midday_start_hour: u32,
    /// Hour (inclusive) at which the evening bucket begins.
    pub evening_start_hour: u32,
    /// Hour (exclusive) at which the evening bucket ends.
    pub evening_end_hour: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            low_max_sessions: 3,
            moderate_max_sessions: 10,
            morning_start_hour: 6,
            midday_start_hour: 12,
            evening_start_hour: 17,
            evening_end_hour: 21,
        }
    }
}

/// Classify a session count into an engagement level.
pub fn engagement_level(total_sessions: u32, config: &ClassifierConfig) -> EngagementLevel {
    if total_sessions < config.low_max_sessions {
        EngagementLevel::Low
    } else if total_sessions < config.moderate_max_sessions {
        EngagementLevel::Moderate
    } else {
        EngagementLevel::High
    }
}

/// Bucket an hour of day (0-23, UTC) into a time-of-day preference.
///
/// Hours outside all buckets (late night, early morning) map to `Unset`.
pub fn time_of_day(hour: u32, config: &ClassifierConfig) -> TimeOfDay {
    if (config.morning_start_hour..config.midday_start_hour).contains(&hour) {
        TimeOfDay::Morning
    } else if (config.midday_start_hour..config.evening_start_hour).contains(&hour) {
        TimeOfDay::Midday
    } else if (config.evening_start_hour..config.evening_end_hour).contains(&hour) {
        TimeOfDay::Evening
    } else {
        TimeOfDay::Unset
    }
}
