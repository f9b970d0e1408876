//! Error types for dispatch operations.

use database::DatabaseError;
use thiserror::Error;

/// Errors that abort a whole dispatch run or activity update.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The settings list for the run could not be read at all.
    #[error("settings list unavailable: {0}")]
    SettingsUnavailable(#[source] DatabaseError),

    /// Database failure outside the per-user loop.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
}
