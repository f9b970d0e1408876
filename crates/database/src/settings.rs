//! Notification settings storage.
//!
//! One row per (user, family). Rows are created lazily with schema
//! defaults on first fetch. The `last_*_sent` stamps are written through
//! [`stamp_sent`], a compare-and-set update that makes overlapping
//! dispatch runs safe: whichever run stamps first wins, the other observes
//! [`StampOutcome::Conflict`].

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::warn;

use companion_core::{
    NotificationCategory, NotificationFamily, NotificationSettings, SuggestionFrequency,
    SummaryDay,
};

use crate::error::{DatabaseError, Result};
use crate::models::SettingsRow;
use crate::tracker::parse_day;

const SELECT_COLUMNS: &str = r#"
        SELECT user_id, family, morning_enabled, midday_enabled,
               afternoon_enabled, evening_enabled, daily_reflection_enabled,
               suggestions_enabled, weekly_summary_enabled,
               monthly_report_enabled, suggestion_frequency,
               weekly_summary_day, last_morning_sent, last_midday_sent,
               last_afternoon_sent, last_evening_sent,
               last_daily_reflection_sent, last_suggestion_sent,
               last_weekly_summary_sent, last_monthly_report_sent
        FROM notification_settings
"#;

/// Outcome of a conditional stamp write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampOutcome {
    /// The stamp was written.
    Stamped,
    /// The stored stamp no longer matched the expected value; another run
    /// stamped it first and nothing was written.
    Conflict,
}

/// Get a user's settings record for a family, if one exists.
pub async fn get(
    pool: &SqlitePool,
    user_id: &str,
    family: NotificationFamily,
) -> Result<Option<NotificationSettings>> {
    let query = format!("{SELECT_COLUMNS} WHERE user_id = ? AND family = ?");
    let row = sqlx::query_as::<_, SettingsRow>(&query)
        .bind(user_id)
        .bind(family.as_str())
        .fetch_optional(pool)
        .await?;

    row.map(to_domain).transpose()
}

/// Get a user's settings record, creating it with defaults if absent.
pub async fn get_or_create(
    pool: &SqlitePool,
    user_id: &str,
    family: NotificationFamily,
) -> Result<NotificationSettings> {
    if let Some(existing) = get(pool, user_id, family).await? {
        return Ok(existing);
    }

    // Schema defaults supply every other column; OR IGNORE makes a racing
    // creation harmless.
    sqlx::query(
        r#"
        INSERT OR IGNORE INTO notification_settings (user_id, family)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(family.as_str())
    .execute(pool)
    .await?;

    get(pool, user_id, family).await?.ok_or(DatabaseError::NotFound {
        entity: "Settings",
        id: format!("{}/{}", user_id, family.as_str()),
    })
}

/// List all user IDs that have a settings record for a family.
pub async fn list_user_ids(pool: &SqlitePool, family: NotificationFamily) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT user_id
        FROM notification_settings
        WHERE family = ?
        ORDER BY user_id
        "#,
    )
    .bind(family.as_str())
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Enable or disable a notification category for a user.
pub async fn set_enabled(
    pool: &SqlitePool,
    user_id: &str,
    family: NotificationFamily,
    category: NotificationCategory,
    enabled: bool,
) -> Result<()> {
    // Column names come from the category enum, never from user input.
    let column = enabled_column(category);
    let query = format!(
        r#"
        UPDATE notification_settings
        SET {column} = ?, updated_at = datetime('now')
        WHERE user_id = ? AND family = ?
        "#,
    );

    let result = sqlx::query(&query)
        .bind(enabled)
        .bind(user_id)
        .bind(family.as_str())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(user_id, family));
    }
    Ok(())
}

/// Set the proactive-suggestion cadence for a user.
pub async fn set_suggestion_frequency(
    pool: &SqlitePool,
    user_id: &str,
    family: NotificationFamily,
    frequency: SuggestionFrequency,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE notification_settings
        SET suggestion_frequency = ?, updated_at = datetime('now')
        WHERE user_id = ? AND family = ?
        "#,
    )
    .bind(frequency.as_str())
    .bind(user_id)
    .bind(family.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(user_id, family));
    }
    Ok(())
}

/// Set the weekly-summary day for a user.
pub async fn set_weekly_summary_day(
    pool: &SqlitePool,
    user_id: &str,
    family: NotificationFamily,
    day: SummaryDay,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE notification_settings
        SET weekly_summary_day = ?, updated_at = datetime('now')
        WHERE user_id = ? AND family = ?
        "#,
    )
    .bind(day.as_str())
    .bind(user_id)
    .bind(family.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(user_id, family));
    }
    Ok(())
}

/// Conditionally record a successful send day for a category.
///
/// The write succeeds only if the stored stamp still equals `expected`
/// (the value observed in the snapshot the caller evaluated eligibility
/// against). A zero-row update means a concurrent run stamped first;
/// callers treat that as "already sent" and skip.
pub async fn stamp_sent(
    pool: &SqlitePool,
    user_id: &str,
    family: NotificationFamily,
    category: NotificationCategory,
    expected: Option<NaiveDate>,
    day: NaiveDate,
) -> Result<StampOutcome> {
    let column = stamp_column(category);
    // `IS ?` instead of `= ?` so a NULL expected value compares equal.
    let query = format!(
        r#"
        UPDATE notification_settings
        SET {column} = ?, updated_at = datetime('now')
        WHERE user_id = ? AND family = ? AND {column} IS ?
        "#,
    );

    let result = sqlx::query(&query)
        .bind(day.to_string())
        .bind(user_id)
        .bind(family.as_str())
        .bind(expected.map(|d| d.to_string()))
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        Ok(StampOutcome::Conflict)
    } else {
        Ok(StampOutcome::Stamped)
    }
}

/// Get the database column holding a category's enabled flag.
fn enabled_column(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::Morning => "morning_enabled",
        NotificationCategory::Midday => "midday_enabled",
        NotificationCategory::Afternoon => "afternoon_enabled",
        NotificationCategory::Evening => "evening_enabled",
        NotificationCategory::DailyReflection => "daily_reflection_enabled",
        NotificationCategory::Suggestion => "suggestions_enabled",
        NotificationCategory::WeeklySummary => "weekly_summary_enabled",
        NotificationCategory::MonthlyReport => "monthly_report_enabled",
    }
}

/// Get the database column holding a category's last-sent stamp.
fn stamp_column(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::Morning => "last_morning_sent",
        NotificationCategory::Midday => "last_midday_sent",
        NotificationCategory::Afternoon => "last_afternoon_sent",
        NotificationCategory::Evening => "last_evening_sent",
        NotificationCategory::DailyReflection => "last_daily_reflection_sent",
        NotificationCategory::Suggestion => "last_suggestion_sent",
        NotificationCategory::WeeklySummary => "last_weekly_summary_sent",
        NotificationCategory::MonthlyReport => "last_monthly_report_sent",
    }
}

fn to_domain(row: SettingsRow) -> Result<NotificationSettings> {
    let family = NotificationFamily::parse(&row.family).ok_or_else(|| DatabaseError::Invalid {
        entity: "Settings",
        id: row.user_id.clone(),
        reason: format!("family: {}", row.family),
    })?;

    // Malformed cadence values degrade to None so eligibility fails closed
    // for the affected category instead of poisoning the whole record.
    let suggestion_frequency = SuggestionFrequency::parse(&row.suggestion_frequency);
    if suggestion_frequency.is_none() {
        warn!(
            user_id = %row.user_id,
            value = %row.suggestion_frequency,
            "Unrecognized suggestion frequency, treating as ineligible"
        );
    }
    let weekly_summary_day = SummaryDay::parse(&row.weekly_summary_day);
    if weekly_summary_day.is_none() {
        warn!(
            user_id = %row.user_id,
            value = %row.weekly_summary_day,
            "Unrecognized weekly summary day, treating as ineligible"
        );
    }

    Ok(NotificationSettings {
        morning_enabled: row.morning_enabled,
        midday_enabled: row.midday_enabled,
        afternoon_enabled: row.afternoon_enabled,
        evening_enabled: row.evening_enabled,
        daily_reflection_enabled: row.daily_reflection_enabled,
        suggestions_enabled: row.suggestions_enabled,
        weekly_summary_enabled: row.weekly_summary_enabled,
        monthly_report_enabled: row.monthly_report_enabled,
        suggestion_frequency,
        weekly_summary_day,
        last_morning_sent: stamp(&row.user_id, row.last_morning_sent)?,
        last_midday_sent: stamp(&row.user_id, row.last_midday_sent)?,
        last_afternoon_sent: stamp(&row.user_id, row.last_afternoon_sent)?,
        last_evening_sent: stamp(&row.user_id, row.last_evening_sent)?,
        last_daily_reflection_sent: stamp(&row.user_id, row.last_daily_reflection_sent)?,
        last_suggestion_sent: stamp(&row.user_id, row.last_suggestion_sent)?,
        last_weekly_summary_sent: stamp(&row.user_id, row.last_weekly_summary_sent)?,
        last_monthly_report_sent: stamp(&row.user_id, row.last_monthly_report_sent)?,
        user_id: row.user_id,
        family,
    })
}

fn stamp(user_id: &str, value: Option<String>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) => parse_day(&s).map(Some).map_err(|reason| DatabaseError::Invalid {
            entity: "Settings",
            id: user_id.to_string(),
            reason,
        }),
    }
}

fn not_found(user_id: &str, family: NotificationFamily) -> DatabaseError {
    DatabaseError::NotFound {
        entity: "Settings",
        id: format!("{}/{}", user_id, family.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_idempotent() {
        let db = test_db().await;

        let first = get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();
        let second = get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();
        assert_eq!(first, second);

        // A different family gets its own row.
        get_or_create(db.pool(), "user-1", NotificationFamily::Nutrition)
            .await
            .unwrap();
        let companion_users = list_user_ids(db.pool(), NotificationFamily::Companion)
            .await
            .unwrap();
        assert_eq!(companion_users.len(), 1);
    }

    #[tokio::test]
    async fn test_set_enabled_round_trip() {
        let db = test_db().await;
        get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();

        set_enabled(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            NotificationCategory::Evening,
            true,
        )
        .await
        .unwrap();

        let record = get(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap()
            .unwrap();
        assert!(record.evening_enabled);
    }

    #[tokio::test]
    async fn test_set_enabled_missing_record() {
        let db = test_db().await;
        let result = set_enabled(
            db.pool(),
            "nobody",
            NotificationFamily::Companion,
            NotificationCategory::Morning,
            false,
        )
        .await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cadence_round_trip() {
        let db = test_db().await;
        get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();

        set_suggestion_frequency(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            SuggestionFrequency::Weekly,
        )
        .await
        .unwrap();
        set_weekly_summary_day(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            SummaryDay::MondayMorning,
        )
        .await
        .unwrap();

        let record = get(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.suggestion_frequency, Some(SuggestionFrequency::Weekly));
        assert_eq!(record.weekly_summary_day, Some(SummaryDay::MondayMorning));
    }

    #[tokio::test]
    async fn test_malformed_cadence_degrades_to_none() {
        let db = test_db().await;
        get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();

        sqlx::query(
            "UPDATE notification_settings SET suggestion_frequency = 'sometimes' WHERE user_id = ?",
        )
        .bind("user-1")
        .execute(db.pool())
        .await
        .unwrap();

        let record = get(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.suggestion_frequency, None);
    }

    #[tokio::test]
    async fn test_stamp_from_none() {
        let db = test_db().await;
        get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();

        let outcome = stamp_sent(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            NotificationCategory::Morning,
            None,
            day(2024, 3, 5),
        )
        .await
        .unwrap();
        assert_eq!(outcome, StampOutcome::Stamped);

        let record = get(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.last_morning_sent, Some(day(2024, 3, 5)));
    }

    #[tokio::test]
    async fn test_stamp_conflict_when_expectation_stale() {
        let db = test_db().await;
        get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();

        // First run stamps from None.
        stamp_sent(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            NotificationCategory::Morning,
            None,
            day(2024, 3, 5),
        )
        .await
        .unwrap();

        // A second run that also observed None must lose.
        let outcome = stamp_sent(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            NotificationCategory::Morning,
            None,
            day(2024, 3, 5),
        )
        .await
        .unwrap();
        assert_eq!(outcome, StampOutcome::Conflict);

        // A run that observed the current stamp may advance it.
        let outcome = stamp_sent(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            NotificationCategory::Morning,
            Some(day(2024, 3, 5)),
            day(2024, 3, 6),
        )
        .await
        .unwrap();
        assert_eq!(outcome, StampOutcome::Stamped);
    }

    #[tokio::test]
    async fn test_stamps_are_per_category() {
        let db = test_db().await;
        get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();

        stamp_sent(
            db.pool(),
            "user-1",
            NotificationFamily::Companion,
            NotificationCategory::Suggestion,
            None,
            day(2024, 3, 5),
        )
        .await
        .unwrap();

        let record = get(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.last_suggestion_sent, Some(day(2024, 3, 5)));
        assert!(record.last_morning_sent.is_none());
    }
}
