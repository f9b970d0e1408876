//! Dispatch trigger routes.
//!
//! Each notification category is fired by the external scheduler POSTing
//! to its endpoint with no body. Partial failure is a 200 with the
//! per-user errors in the payload; only an inability to read the settings
//! list at all produces a 500.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use companion_core::{NotificationCategory, NotificationFamily};
use dispatcher::DispatchFailure;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Dispatch pass result.
#[derive(Serialize)]
pub struct DispatchResponse {
    pub success: bool,
    pub processed: usize,
    pub skipped: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<DispatchFailure>,
}

/// Run one dispatch pass for a family/category pair.
pub async fn run_dispatch(
    State(state): State<AppState>,
    Path((family, category)): Path<(String, String)>,
) -> Result<Json<DispatchResponse>> {
    let family = NotificationFamily::parse(&family)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown family: {family}")))?;
    let category = NotificationCategory::parse(&category)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown category: {category}")))?;

    info!(
        family = family.as_str(),
        category = category.as_str(),
        "Dispatch triggered"
    );

    let report = state.dispatcher.run(family, category, Utc::now()).await?;

    Ok(Json(DispatchResponse {
        success: report.success(),
        processed: report.processed,
        skipped: report.skipped,
        errors: report.errors,
    }))
}
