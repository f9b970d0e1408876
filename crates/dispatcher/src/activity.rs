//! The activity-event path.

use chrono::{DateTime, Utc};
use tracing::debug;

use companion_core::{ActivityEvent, ClassifierConfig, EngagementTracker};
use database::{tracker, Database};

use crate::error::DispatchError;

/// Record one activity event for a user and return the updated tracker.
///
/// Creates the tracker on a user's first event; otherwise applies the
/// event through the tracker's single mutation path (streak advance,
/// counters, histories, reclassification). Touches exactly one row.
pub async fn record_activity(
    db: &Database,
    user_id: &str,
    event: &ActivityEvent,
    now: DateTime<Utc>,
    config: &ClassifierConfig,
) -> Result<EngagementTracker, DispatchError> {
    let updated = match tracker::get_tracker(db.pool(), user_id).await? {
        None => {
            debug!(user_id = %user_id, "First activity event, creating tracker");
            EngagementTracker::first_activity(user_id, event, now, config)
        }
        Some(mut existing) => {
            existing.apply_activity(event, now, config);
            existing
        }
    };

    tracker::upsert_tracker(db.pool(), &updated).await?;
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use companion_core::{ActivityKind, EngagementLevel};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_event_creates_tracker() {
        let db = test_db().await;
        let config = ClassifierConfig::default();

        let tracker = record_activity(
            &db,
            "user-1",
            &ActivityEvent::bare(ActivityKind::Chat),
            at(2024, 3, 1, 9),
            &config,
        )
        .await
        .unwrap();

        assert_eq!(tracker.total_sessions, 1);
        assert_eq!(tracker.streak.current, 1);
        assert_eq!(tracker.engagement_level, EngagementLevel::Low);
    }

    #[tokio::test]
    async fn test_events_accumulate_across_calls() {
        let db = test_db().await;
        let config = ClassifierConfig::default();
        let event = ActivityEvent::bare(ActivityKind::DeepStudy);

        record_activity(&db, "user-1", &event, at(2024, 3, 1, 9), &config)
            .await
            .unwrap();
        let tracker = record_activity(&db, "user-1", &event, at(2024, 3, 2, 9), &config)
            .await
            .unwrap();

        assert_eq!(tracker.total_sessions, 2);
        assert_eq!(tracker.deep_study_count, 2);
        assert_eq!(tracker.streak.current, 2);

        // The persisted row matches what was returned.
        let stored = database::tracker::get_tracker(db.pool(), "user-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, tracker);
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let db = test_db().await;
        let config = ClassifierConfig::default();
        let event = ActivityEvent::bare(ActivityKind::Chat);

        record_activity(&db, "user-1", &event, at(2024, 3, 1, 9), &config)
            .await
            .unwrap();
        let other = record_activity(&db, "user-2", &event, at(2024, 3, 1, 10), &config)
            .await
            .unwrap();

        assert_eq!(other.total_sessions, 1);
    }
}
