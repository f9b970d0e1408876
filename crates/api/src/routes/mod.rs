//! Route handlers for the API surface.

pub mod activity;
pub mod dispatch;
pub mod health;
pub mod notifications;
pub mod settings;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Scheduler-triggered dispatch passes
        .route("/dispatch/:family/:category", post(dispatch::run_dispatch))
        // Activity events from the chat layer
        .route("/activity", post(activity::record))
        // Settings and notification reads for the client UI
        .route(
            "/settings/:user_id/:family",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/notifications/:user_id", get(notifications::list))
}
