//! Core engagement and notification logic for the Gideon companion service.
//!
//! This crate holds the pure domain logic shared by the dispatcher and the
//! HTTP surface. It defines:
//!
//! - [`clock`] - calendar-day helpers (day keys, gaps, weekday convention)
//! - [`Streak`] - consecutive-day streak computation
//! - [`classify`] - engagement level and time-of-day bucketing
//! - [`EngagementTracker`] - the per-user activity record and its single
//!   mutation entry point
//! - [`NotificationSettings`] / [`eligibility`] - per-user send gating
//! - [`ContentGenerator`] - the trait content backends must implement
//! - [`RetryConfig`] - backoff policy for rate-limited collaborators
//!
//! Everything here is deterministic given an injected "now"; nothing in
//! this crate performs I/O.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use companion_core::{clock, Streak};
//!
//! let yesterday = clock::day_key(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
//! let now = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
//!
//! let streak = Streak::new().advance(yesterday, clock::day_key(now));
//! assert_eq!(streak.current, 2);
//! ```

pub mod classify;
pub mod clock;
mod content;
pub mod eligibility;
mod retry;
mod settings;
mod streak;
mod tracker;

pub use classify::{ClassifierConfig, EngagementLevel, TimeOfDay};
pub use content::{ContentError, ContentGenerator, ContentRequest, GeneratedContent};
pub use eligibility::{is_eligible, recent_activity, NotificationCategory};
pub use retry::{retry_transient, RetryConfig};
pub use settings::{NotificationFamily, NotificationSettings, SuggestionFrequency, SummaryDay};
pub use streak::Streak;
pub use tracker::{ActivityEvent, ActivityKind, EngagementTracker, HISTORY_LIMIT};

// Re-export async_trait for implementors of ContentGenerator.
pub use async_trait::async_trait;
