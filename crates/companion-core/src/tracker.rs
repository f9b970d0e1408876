//! The per-user engagement tracker and its mutation path.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{self, ClassifierConfig, EngagementLevel, TimeOfDay};
use crate::clock;
use crate::streak::Streak;

/// Maximum entries kept in the tone/theme histories.
pub const HISTORY_LIMIT: usize = 10;

/// The kind of activity a user produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// An extended study session.
    DeepStudy,
    /// A short one-off question.
    QuickAsk,
    /// A plain conversational message.
    Chat,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::DeepStudy => "deep_study",
            ActivityKind::QuickAsk => "quick_ask",
            ActivityKind::Chat => "chat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deep_study" => Some(ActivityKind::DeepStudy),
            "quick_ask" => Some(ActivityKind::QuickAsk),
            "chat" => Some(ActivityKind::Chat),
            _ => None,
        }
    }
}

/// A single activity event, as reported by the chat/front-end layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    /// Detected emotional tone tag for this event, if any.
    pub emotional_tone: Option<String>,
    /// Detected spiritual theme tag for this event, if any.
    pub spiritual_theme: Option<String>,
}

impl ActivityEvent {
    /// An event with no tone/theme tags.
    pub fn bare(kind: ActivityKind) -> Self {
        Self {
            kind,
            emotional_tone: None,
            spiritual_theme: None,
        }
    }
}

/// Per-user record of activity recency, streaks, and derived classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementTracker {
    pub user_id: String,
    /// Timestamp of the most recent activity event.
    pub last_active_at: DateTime<Utc>,
    /// Total activity events, all kinds.
    pub total_sessions: u32,
    pub deep_study_count: u32,
    pub quick_ask_count: u32,
    /// Most recent emotional tone tags, oldest first, bounded to
    /// [`HISTORY_LIMIT`].
    pub emotional_tones: Vec<String>,
    /// Most recent spiritual theme tags, oldest first, bounded to
    /// [`HISTORY_LIMIT`].
    pub spiritual_themes: Vec<String>,
    pub streak: Streak,
    /// Derived from `total_sessions`; never set directly.
    pub engagement_level: EngagementLevel,
    /// Derived from the hour of the most recent event; never set directly.
    pub preferred_time_of_day: TimeOfDay,
}

impl EngagementTracker {
    /// Create a tracker from a user's first activity event.
    pub fn first_activity(
        user_id: impl Into<String>,
        event: &ActivityEvent,
        now: DateTime<Utc>,
        config: &ClassifierConfig,
    ) -> Self {
        let mut tracker = Self {
            user_id: user_id.into(),
            last_active_at: now,
            total_sessions: 0,
            deep_study_count: 0,
            quick_ask_count: 0,
            emotional_tones: Vec::new(),
            spiritual_themes: Vec::new(),
            streak: Streak::new(),
            engagement_level: EngagementLevel::Low,
            preferred_time_of_day: TimeOfDay::Unset,
        };
        tracker.count_event(event, now, config);
        tracker
    }

    /// Apply a subsequent activity event.
    ///
    /// This is the only mutation path for a tracker: it advances the
    /// streak, bumps counters and histories, reclassifies, and moves
    /// `last_active_at` forward.
    pub fn apply_activity(
        &mut self,
        event: &ActivityEvent,
        now: DateTime<Utc>,
        config: &ClassifierConfig,
    ) {
        let last_day = clock::day_key(self.last_active_at);
        self.streak = self.streak.advance(last_day, clock::day_key(now));
        self.count_event(event, now, config);
    }

    fn count_event(&mut self, event: &ActivityEvent, now: DateTime<Utc>, config: &ClassifierConfig) {
        self.total_sessions += 1;
        match event.kind {
            ActivityKind::DeepStudy => self.deep_study_count += 1,
            ActivityKind::QuickAsk => self.quick_ask_count += 1,
            ActivityKind::Chat => {}
        }
        if let Some(tone) = &event.emotional_tone {
            push_bounded(&mut self.emotional_tones, tone.clone());
        }
        if let Some(theme) = &event.spiritual_theme {
            push_bounded(&mut self.spiritual_themes, theme.clone());
        }
        self.engagement_level = classify::engagement_level(self.total_sessions, config);
        self.preferred_time_of_day = classify::time_of_day(now.hour(), config);
        self.last_active_at = now;
    }
}

/// Append a tag, dropping the oldest entry once the history is full.
fn push_bounded(history: &mut Vec<String>, tag: String) {
    history.push(tag);
    if history.len() > HISTORY_LIMIT {
        history.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn config() -> ClassifierConfig {
        ClassifierConfig::default()
    }

    #[test]
    fn test_first_activity() {
        let event = ActivityEvent::bare(ActivityKind::DeepStudy);
        let tracker = EngagementTracker::first_activity("user-1", &event, at(2024, 3, 1, 9), &config());

        assert_eq!(tracker.total_sessions, 1);
        assert_eq!(tracker.deep_study_count, 1);
        assert_eq!(tracker.quick_ask_count, 0);
        assert_eq!(tracker.streak.current, 1);
        assert_eq!(tracker.streak.longest, 1);
        assert_eq!(tracker.engagement_level, EngagementLevel::Low);
        assert_eq!(tracker.preferred_time_of_day, TimeOfDay::Morning);
    }

    #[test]
    fn test_same_day_events_do_not_grow_streak() {
        let event = ActivityEvent::bare(ActivityKind::Chat);
        let mut tracker = EngagementTracker::first_activity("u", &event, at(2024, 3, 1, 9), &config());

        tracker.apply_activity(&event, at(2024, 3, 1, 11), &config());
        tracker.apply_activity(&event, at(2024, 3, 1, 20), &config());

        assert_eq!(tracker.streak.current, 1);
        assert_eq!(tracker.total_sessions, 3);
    }

    #[test]
    fn test_next_day_grows_streak() {
        let event = ActivityEvent::bare(ActivityKind::Chat);
        let mut tracker = EngagementTracker::first_activity("u", &event, at(2024, 3, 1, 9), &config());

        tracker.apply_activity(&event, at(2024, 3, 2, 8), &config());
        assert_eq!(tracker.streak.current, 2);
        assert_eq!(tracker.streak.longest, 2);
    }

    #[test]
    fn test_gap_resets_streak_and_marks_break() {
        let event = ActivityEvent::bare(ActivityKind::Chat);
        let mut tracker = EngagementTracker::first_activity("u", &event, at(2024, 3, 1, 9), &config());
        tracker.apply_activity(&event, at(2024, 3, 2, 9), &config());

        tracker.apply_activity(&event, at(2024, 3, 5, 8), &config());
        assert_eq!(tracker.streak.current, 1);
        assert_eq!(tracker.streak.longest, 2);
        assert_eq!(
            tracker.streak.broken_at,
            Some(chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap())
        );
    }

    #[test]
    fn test_subtype_counters() {
        let mut tracker = EngagementTracker::first_activity(
            "u",
            &ActivityEvent::bare(ActivityKind::QuickAsk),
            at(2024, 3, 1, 9),
            &config(),
        );
        tracker.apply_activity(&ActivityEvent::bare(ActivityKind::DeepStudy), at(2024, 3, 1, 10), &config());
        tracker.apply_activity(&ActivityEvent::bare(ActivityKind::Chat), at(2024, 3, 1, 11), &config());

        assert_eq!(tracker.quick_ask_count, 1);
        assert_eq!(tracker.deep_study_count, 1);
        assert_eq!(tracker.total_sessions, 3);
    }

    #[test]
    fn test_histories_bounded() {
        let mut tracker = EngagementTracker::first_activity(
            "u",
            &ActivityEvent::bare(ActivityKind::Chat),
            at(2024, 3, 1, 9),
            &config(),
        );

        for i in 0..12 {
            let event = ActivityEvent {
                kind: ActivityKind::Chat,
                emotional_tone: Some(format!("tone-{i}")),
                spiritual_theme: None,
            };
            tracker.apply_activity(&event, at(2024, 3, 1, 10), &config());
        }

        assert_eq!(tracker.emotional_tones.len(), HISTORY_LIMIT);
        // Oldest entries dropped first.
        assert_eq!(tracker.emotional_tones.first().unwrap(), "tone-2");
        assert_eq!(tracker.emotional_tones.last().unwrap(), "tone-11");
        assert!(tracker.spiritual_themes.is_empty());
    }

    #[test]
    fn test_classification_follows_sessions() {
        let event = ActivityEvent::bare(ActivityKind::Chat);
        let mut tracker = EngagementTracker::first_activity("u", &event, at(2024, 3, 1, 9), &config());
        assert_eq!(tracker.engagement_level, EngagementLevel::Low);

        for _ in 0..2 {
            tracker.apply_activity(&event, at(2024, 3, 1, 10), &config());
        }
        assert_eq!(tracker.total_sessions, 3);
        assert_eq!(tracker.engagement_level, EngagementLevel::Moderate);

        for _ in 0..7 {
            tracker.apply_activity(&event, at(2024, 3, 1, 11), &config());
        }
        assert_eq!(tracker.total_sessions, 10);
        assert_eq!(tracker.engagement_level, EngagementLevel::High);
    }

    #[test]
    fn test_time_of_day_last_write_wins() {
        let event = ActivityEvent::bare(ActivityKind::Chat);
        let mut tracker = EngagementTracker::first_activity("u", &event, at(2024, 3, 1, 9), &config());
        assert_eq!(tracker.preferred_time_of_day, TimeOfDay::Morning);

        tracker.apply_activity(&event, at(2024, 3, 1, 18), &config());
        assert_eq!(tracker.preferred_time_of_day, TimeOfDay::Evening);

        // A late-night event overwrites with Unset rather than keeping the
        // previous bucket.
        tracker.apply_activity(&event, at(2024, 3, 1, 23), &config());
        assert_eq!(tracker.preferred_time_of_day, TimeOfDay::Unset);
    }
}
