//! Delivered-notification records.
//!
//! The append-only sink the client UI reads. Dispatch writes one record
//! per successful send; nothing in this service ever updates or deletes
//! them.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{NewNotification, NotificationRecord};

/// Create a notification record. Returns its row ID.
pub async fn create_notification(pool: &SqlitePool, new: &NewNotification) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (recipient, title, message, category, family)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.recipient)
    .bind(&new.title)
    .bind(&new.message)
    .bind(&new.category)
    .bind(&new.family)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get the most recent notifications for a recipient, newest first.
pub async fn list_for_recipient(
    pool: &SqlitePool,
    recipient: &str,
    limit: i64,
) -> Result<Vec<NotificationRecord>> {
    let records = sqlx::query_as::<_, NotificationRecord>(
        r#"
        SELECT id, recipient, title, message, category, family, created_at
        FROM notifications
        WHERE recipient = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(recipient)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Count all notification records.
pub async fn count_all(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM notifications
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
