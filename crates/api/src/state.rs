//! Application state shared across handlers.

use std::sync::Arc;

use companion_core::ClassifierConfig;
use database::Database;
use dispatcher::Dispatcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Notification dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Classifier thresholds for the activity path.
    pub classifier: ClassifierConfig,
}

impl AppState {
    /// Create new application state with default classifier thresholds.
    pub fn new(db: Database, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            db,
            dispatcher,
            classifier: ClassifierConfig::default(),
        }
    }
}
