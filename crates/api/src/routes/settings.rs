//! Settings routes.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use companion_core::{
    NotificationCategory, NotificationFamily, NotificationSettings, SuggestionFrequency,
    SummaryDay,
};
use database::settings;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Partial settings update. Every field is optional; a `category` toggle
/// requires `enabled`.
#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub category: Option<String>,
    pub enabled: Option<bool>,
    pub suggestion_frequency: Option<String>,
    pub weekly_summary_day: Option<String>,
}

/// Get a user's settings for a family, creating defaults if absent.
pub async fn get_settings(
    State(state): State<AppState>,
    Path((user_id, family)): Path<(String, String)>,
) -> Result<Json<NotificationSettings>> {
    let family = parse_family(&family)?;
    let record = settings::get_or_create(state.db.pool(), &user_id, family).await?;
    Ok(Json(record))
}

/// Apply a partial settings update and return the new record.
pub async fn update_settings(
    State(state): State<AppState>,
    Path((user_id, family)): Path<(String, String)>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<NotificationSettings>> {
    let family = parse_family(&family)?;
    let pool = state.db.pool();

    // Ensure the record exists before updating it.
    settings::get_or_create(pool, &user_id, family).await?;

    match (&req.category, req.enabled) {
        (Some(category), Some(enabled)) => {
            let category = NotificationCategory::parse(category)
                .ok_or_else(|| ApiError::BadRequest(format!("unknown category: {category}")))?;
            settings::set_enabled(pool, &user_id, family, category, enabled).await?;
        }
        (Some(_), None) => {
            return Err(ApiError::BadRequest(
                "'enabled' is required when 'category' is set".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(ApiError::BadRequest(
                "'category' is required when 'enabled' is set".to_string(),
            ));
        }
        (None, None) => {}
    }

    if let Some(frequency) = &req.suggestion_frequency {
        let frequency = SuggestionFrequency::parse(frequency).ok_or_else(|| {
            ApiError::BadRequest(format!("unknown suggestion frequency: {frequency}"))
        })?;
        settings::set_suggestion_frequency(pool, &user_id, family, frequency).await?;
    }

    if let Some(day) = &req.weekly_summary_day {
        let day = SummaryDay::parse(day)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown weekly summary day: {day}")))?;
        settings::set_weekly_summary_day(pool, &user_id, family, day).await?;
    }

    let record = settings::get_or_create(pool, &user_id, family).await?;
    Ok(Json(record))
}

fn parse_family(family: &str) -> Result<NotificationFamily> {
    NotificationFamily::parse(family)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown family: {family}")))
}
