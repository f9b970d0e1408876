//! The content generator seam.
//!
//! Content backends (an LLM API in production, mocks in tests) implement
//! [`ContentGenerator`]. The trait is object-safe so the dispatcher can
//! hold a `Box<dyn ContentGenerator>` or `Arc<dyn ContentGenerator>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eligibility::NotificationCategory;
use crate::settings::NotificationFamily;

/// A request to produce one notification's content for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub user_id: String,
    pub family: NotificationFamily,
    pub category: NotificationCategory,
    /// Free-form personalization context (streak, engagement level, recent
    /// themes). Backends may use as much or as little of it as they like.
    pub context: serde_json::Value,
}

/// Generated notification content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub body: String,
}

/// Errors a content backend can produce.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The backend rejected the call due to rate limiting. Retryable.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The backend is temporarily unreachable or failing. Retryable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// The call timed out. Retryable.
    #[error("generation timed out")]
    Timeout,

    /// The backend answered, but not with usable content. Not retryable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend is misconfigured. Not retryable.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ContentError {
    /// Whether retrying the same call could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ContentError::RateLimited(_) | ContentError::Unavailable(_) | ContentError::Timeout
        )
    }
}

/// A backend that turns a [`ContentRequest`] into notification content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate content for a single notification.
    async fn generate(&self, request: ContentRequest) -> Result<GeneratedContent, ContentError>;

    /// Human-readable backend name, for logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ContentError::RateLimited("429".into()).is_transient());
        assert!(ContentError::Unavailable("503".into()).is_transient());
        assert!(ContentError::Timeout.is_transient());
        assert!(!ContentError::InvalidResponse("bad json".into()).is_transient());
        assert!(!ContentError::Configuration("no key".into()).is_transient());
    }
}
