//! SQLite persistence layer for Gideon.
//!
//! This crate provides async database operations for engagement trackers,
//! notification settings, and delivered notifications using SQLx with
//! SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{settings, Database};
//! use companion_core::NotificationFamily;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:gideon.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Settings records are created lazily with defaults
//!     let record =
//!         settings::get_or_create(db.pool(), "user-1", NotificationFamily::Companion).await?;
//!     assert!(record.morning_enabled);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod models;
pub mod notification;
pub mod settings;
pub mod tracker;

pub use error::{DatabaseError, Result};
pub use models::{NewNotification, NotificationRecord};
pub use settings::StampOutcome;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/gideon.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    /// Default pool size for database connections.
    /// Sized for concurrent activity-event traffic alongside dispatch runs.
    const DEFAULT_POOL_SIZE: u32 = 20;

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use companion_core::{
        ActivityEvent, ActivityKind, ClassifierConfig, EngagementTracker, NotificationFamily,
    };

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_tracker_round_trip() {
        let db = test_db().await;
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        let event = ActivityEvent {
            kind: ActivityKind::DeepStudy,
            emotional_tone: Some("hopeful".to_string()),
            spiritual_theme: Some("patience".to_string()),
        };
        let domain =
            EngagementTracker::first_activity("user-1", &event, now, &ClassifierConfig::default());
        tracker::upsert_tracker(db.pool(), &domain).await.unwrap();

        let fetched = tracker::get_tracker(db.pool(), "user-1").await.unwrap().unwrap();
        assert_eq!(fetched, domain);

        // Missing user decodes to None, not an error.
        let missing = tracker::get_tracker(db.pool(), "nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_settings_created_lazily() {
        let db = test_db().await;

        let record = settings::get_or_create(db.pool(), "user-1", NotificationFamily::Companion)
            .await
            .unwrap();
        assert!(record.morning_enabled);
        assert!(record.last_morning_sent.is_none());

        // Listed per family.
        let users = settings::list_user_ids(db.pool(), NotificationFamily::Companion)
            .await
            .unwrap();
        assert_eq!(users, vec!["user-1".to_string()]);
        let other = settings::list_user_ids(db.pool(), NotificationFamily::Nutrition)
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
