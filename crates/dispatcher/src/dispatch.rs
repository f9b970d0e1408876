//! The scheduled dispatch loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use companion_core::{
    clock, eligibility, retry_transient, ContentError, ContentGenerator, ContentRequest,
    EngagementTracker, NotificationCategory, NotificationFamily, RetryConfig,
};
use database::{notification, settings, tracker, Database, NewNotification, StampOutcome};

use crate::error::DispatchError;

/// Tuning for a dispatcher instance.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Budget for one user's content generation, including retries. A user
    /// whose generation exceeds this is recorded as failed and the pass
    /// moves on.
    pub generation_timeout: Duration,

    /// Retry policy for transient generator errors within one user's
    /// attempt.
    pub retry: RetryConfig,

    /// Trailing window (days) a user must have been active in for
    /// activity-gated categories.
    pub activity_window_days: i64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            activity_window_days: 30,
        }
    }
}

/// One user's failure within a dispatch run.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchFailure {
    pub user_id: String,
    pub error: String,
}

/// The result of one dispatch pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    /// Users a notification was sent to.
    pub processed: usize,
    /// Users skipped as ineligible (or already handled by a concurrent run).
    pub skipped: usize,
    /// Per-user failures; these users keep their previous stamp and are
    /// retried naturally on the next scheduled run.
    pub errors: Vec<DispatchFailure>,
}

impl DispatchReport {
    /// Whether every processed user succeeded.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// What happened for a single user within a pass.
enum UserOutcome {
    Sent,
    Skipped,
}

/// Per-user failure causes. Stringified into [`DispatchFailure`].
#[derive(Debug, Error)]
enum UserError {
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    #[error("content generation failed: {0}")]
    Content(#[from] ContentError),

    #[error("content generation timed out after {0:?}")]
    Timeout(Duration),
}

/// Runs scheduled notification passes for one settings family at a time.
pub struct Dispatcher {
    db: Database,
    generator: Arc<dyn ContentGenerator>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a dispatcher with default tuning.
    pub fn new(db: Database, generator: Arc<dyn ContentGenerator>) -> Self {
        Self::with_config(db, generator, DispatcherConfig::default())
    }

    /// Create a dispatcher with explicit tuning.
    pub fn with_config(
        db: Database,
        generator: Arc<dyn ContentGenerator>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            db,
            generator,
            config,
        }
    }

    /// Run one dispatch pass over every settings record in `family`,
    /// targeting `category`, with "now" injected by the caller.
    ///
    /// Each user is processed independently: their settings are re-read as
    /// a fresh snapshot, eligibility is evaluated against it, and a
    /// successful generation is committed with a conditional stamp so an
    /// overlapping run cannot double-send. Per-user failures are collected
    /// in the report; only a failure to list the settings records aborts.
    pub async fn run(
        &self,
        family: NotificationFamily,
        category: NotificationCategory,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, DispatchError> {
        let user_ids = settings::list_user_ids(self.db.pool(), family)
            .await
            .map_err(DispatchError::SettingsUnavailable)?;

        info!(
            family = family.as_str(),
            category = category.as_str(),
            users = user_ids.len(),
            "Starting dispatch pass"
        );

        let mut report = DispatchReport::default();
        for user_id in user_ids {
            match self.process_user(&user_id, family, category, now).await {
                Ok(UserOutcome::Sent) => report.processed += 1,
                Ok(UserOutcome::Skipped) => report.skipped += 1,
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "Dispatch failed for user");
                    report.errors.push(DispatchFailure {
                        user_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            failed = report.errors.len(),
            "Dispatch pass complete"
        );
        Ok(report)
    }

    /// Evaluate and, if eligible, send to a single user.
    async fn process_user(
        &self,
        user_id: &str,
        family: NotificationFamily,
        category: NotificationCategory,
        now: DateTime<Utc>,
    ) -> Result<UserOutcome, UserError> {
        let pool = self.db.pool();
        let today = clock::day_key(now);

        // Fresh snapshot per user, read immediately before evaluation.
        let Some(record) = settings::get(pool, user_id, family).await? else {
            debug!(user_id = %user_id, "Settings record gone mid-run, skipping");
            return Ok(UserOutcome::Skipped);
        };

        if !eligibility::is_eligible(&record, category, today) {
            return Ok(UserOutcome::Skipped);
        }

        let user_tracker = tracker::get_tracker(pool, user_id).await?;

        if category.requires_recent_activity() {
            let last_active_day = user_tracker.as_ref().map(|t| clock::day_key(t.last_active_at));
            if !eligibility::recent_activity(last_active_day, today, self.config.activity_window_days)
            {
                debug!(
                    user_id = %user_id,
                    category = category.as_str(),
                    "No recent activity, skipping"
                );
                return Ok(UserOutcome::Skipped);
            }
        }

        let request = ContentRequest {
            user_id: user_id.to_string(),
            family,
            category,
            context: personalization_context(user_tracker.as_ref()),
        };

        let generated = match timeout(
            self.config.generation_timeout,
            retry_transient(&self.config.retry, || self.generator.generate(request.clone())),
        )
        .await
        {
            Err(_elapsed) => return Err(UserError::Timeout(self.config.generation_timeout)),
            Ok(Err(err)) => return Err(UserError::Content(err)),
            Ok(Ok(content)) => content,
        };

        // The stamp is the commit point. Writing it conditionally on the
        // snapshot's value serializes overlapping runs: the loser sees a
        // conflict and must not create a second record.
        let expected = record.last_sent(category);
        match settings::stamp_sent(pool, user_id, family, category, expected, today).await? {
            StampOutcome::Conflict => {
                debug!(
                    user_id = %user_id,
                    category = category.as_str(),
                    "Concurrent run already stamped today, skipping"
                );
                Ok(UserOutcome::Skipped)
            }
            StampOutcome::Stamped => {
                notification::create_notification(
                    pool,
                    &NewNotification {
                        recipient: user_id.to_string(),
                        title: generated.title,
                        message: generated.body,
                        category: category.as_str().to_string(),
                        family: family.as_str().to_string(),
                    },
                )
                .await?;
                info!(
                    user_id = %user_id,
                    category = category.as_str(),
                    generator = self.generator.name(),
                    "Notification sent"
                );
                Ok(UserOutcome::Sent)
            }
        }
    }
}

/// Context handed to the content backend for personalization.
fn personalization_context(user_tracker: Option<&EngagementTracker>) -> serde_json::Value {
    match user_tracker {
        None => serde_json::json!({}),
        Some(t) => serde_json::json!({
            "current_streak": t.streak.current,
            "longest_streak": t.streak.longest,
            "engagement_level": t.engagement_level.as_str(),
            "preferred_time_of_day": t.preferred_time_of_day.as_str(),
            "recent_tones": t.emotional_tones,
            "recent_themes": t.spiritual_themes,
        }),
    }
}
