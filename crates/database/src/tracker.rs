//! Engagement tracker storage.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use companion_core::{EngagementLevel, EngagementTracker, Streak, TimeOfDay};

use crate::error::{DatabaseError, Result};
use crate::models::TrackerRow;

/// Get a user's engagement tracker, if one exists.
pub async fn get_tracker(pool: &SqlitePool, user_id: &str) -> Result<Option<EngagementTracker>> {
    let row = sqlx::query_as::<_, TrackerRow>(
        r#"
        SELECT user_id, last_active_at, total_sessions, deep_study_count,
               quick_ask_count, emotional_tones, spiritual_themes,
               current_streak, longest_streak, streak_broken_at,
               engagement_level, preferred_time_of_day
        FROM engagement_trackers
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(to_domain).transpose()
}

/// Create or update a user's engagement tracker from its domain state.
pub async fn upsert_tracker(pool: &SqlitePool, tracker: &EngagementTracker) -> Result<()> {
    let emotional_tones = serde_json::to_string(&tracker.emotional_tones)
        .map_err(|e| invalid(&tracker.user_id, format!("tone history: {e}")))?;
    let spiritual_themes = serde_json::to_string(&tracker.spiritual_themes)
        .map_err(|e| invalid(&tracker.user_id, format!("theme history: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO engagement_trackers (
            user_id, last_active_at, total_sessions, deep_study_count,
            quick_ask_count, emotional_tones, spiritual_themes,
            current_streak, longest_streak, streak_broken_at,
            engagement_level, preferred_time_of_day
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            last_active_at = excluded.last_active_at,
            total_sessions = excluded.total_sessions,
            deep_study_count = excluded.deep_study_count,
            quick_ask_count = excluded.quick_ask_count,
            emotional_tones = excluded.emotional_tones,
            spiritual_themes = excluded.spiritual_themes,
            current_streak = excluded.current_streak,
            longest_streak = excluded.longest_streak,
            streak_broken_at = excluded.streak_broken_at,
            engagement_level = excluded.engagement_level,
            preferred_time_of_day = excluded.preferred_time_of_day,
            updated_at = datetime('now')
        "#,
    )
    .bind(&tracker.user_id)
    .bind(tracker.last_active_at.to_rfc3339())
    .bind(tracker.total_sessions as i64)
    .bind(tracker.deep_study_count as i64)
    .bind(tracker.quick_ask_count as i64)
    .bind(emotional_tones)
    .bind(spiritual_themes)
    .bind(tracker.streak.current as i64)
    .bind(tracker.streak.longest as i64)
    .bind(tracker.streak.broken_at.map(|d| d.to_string()))
    .bind(tracker.engagement_level.as_str())
    .bind(tracker.preferred_time_of_day.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a user's tracker. Returns true if one existed.
pub async fn delete_tracker(pool: &SqlitePool, user_id: &str) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM engagement_trackers
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn to_domain(row: TrackerRow) -> Result<EngagementTracker> {
    let last_active_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.last_active_at)
        .map_err(|e| invalid(&row.user_id, format!("last_active_at: {e}")))?
        .with_timezone(&Utc);

    let broken_at = match &row.streak_broken_at {
        None => None,
        Some(s) => Some(parse_day(s).map_err(|e| invalid(&row.user_id, e))?),
    };

    let emotional_tones: Vec<String> = serde_json::from_str(&row.emotional_tones)
        .map_err(|e| invalid(&row.user_id, format!("tone history: {e}")))?;
    let spiritual_themes: Vec<String> = serde_json::from_str(&row.spiritual_themes)
        .map_err(|e| invalid(&row.user_id, format!("theme history: {e}")))?;

    let engagement_level = EngagementLevel::parse(&row.engagement_level)
        .ok_or_else(|| invalid(&row.user_id, format!("engagement_level: {}", row.engagement_level)))?;
    let preferred_time_of_day = TimeOfDay::parse(&row.preferred_time_of_day).ok_or_else(|| {
        invalid(
            &row.user_id,
            format!("preferred_time_of_day: {}", row.preferred_time_of_day),
        )
    })?;

    Ok(EngagementTracker {
        user_id: row.user_id,
        last_active_at,
        total_sessions: row.total_sessions as u32,
        deep_study_count: row.deep_study_count as u32,
        quick_ask_count: row.quick_ask_count as u32,
        emotional_tones,
        spiritual_themes,
        streak: Streak {
            current: row.current_streak as u32,
            longest: row.longest_streak as u32,
            broken_at,
        },
        engagement_level,
        preferred_time_of_day,
    })
}

pub(crate) fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("day stamp {s:?}: {e}"))
}

fn invalid(user_id: &str, reason: String) -> DatabaseError {
    DatabaseError::Invalid {
        entity: "Tracker",
        id: user_id.to_string(),
        reason,
    }
}
