//! Activity-event route.

use axum::extract::State;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use companion_core::{ActivityEvent, ActivityKind, EngagementLevel, TimeOfDay};
use dispatcher::record_activity;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// An activity event reported by the chat layer.
#[derive(Deserialize)]
pub struct ActivityRequest {
    pub user_id: String,
    /// One of "deep_study", "quick_ask", "chat".
    pub kind: String,
    pub emotional_tone: Option<String>,
    pub spiritual_theme: Option<String>,
}

/// Tracker summary returned after applying an event.
#[derive(Serialize)]
pub struct TrackerResponse {
    pub user_id: String,
    pub total_sessions: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_broken_at: Option<NaiveDate>,
    pub engagement_level: EngagementLevel,
    pub preferred_time_of_day: TimeOfDay,
}

/// Record one activity event and return the updated tracker summary.
pub async fn record(
    State(state): State<AppState>,
    Json(req): Json<ActivityRequest>,
) -> Result<Json<TrackerResponse>> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }
    let kind = ActivityKind::parse(&req.kind)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown activity kind: {}", req.kind)))?;

    let event = ActivityEvent {
        kind,
        emotional_tone: req.emotional_tone,
        spiritual_theme: req.spiritual_theme,
    };

    let tracker =
        record_activity(&state.db, &req.user_id, &event, Utc::now(), &state.classifier).await?;

    Ok(Json(TrackerResponse {
        user_id: tracker.user_id,
        total_sessions: tracker.total_sessions,
        current_streak: tracker.streak.current,
        longest_streak: tracker.streak.longest,
        streak_broken_at: tracker.streak.broken_at,
        engagement_level: tracker.engagement_level,
        preferred_time_of_day: tracker.preferred_time_of_day,
    }))
}
