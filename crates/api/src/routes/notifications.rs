//! Notification read routes.

use axum::extract::{Path, State};
use axum::Json;

use database::{notification, NotificationRecord};

use crate::error::Result;
use crate::state::AppState;

/// How many notifications one listing returns at most.
const LIST_LIMIT: i64 = 50;

/// Get a user's most recent notifications, newest first.
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<NotificationRecord>>> {
    let records = notification::list_for_recipient(state.db.pool(), &user_id, LIST_LIMIT).await?;
    Ok(Json(records))
}
