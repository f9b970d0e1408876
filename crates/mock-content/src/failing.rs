//! Failing generator - always errors.

use std::sync::atomic::{AtomicUsize, Ordering};

use companion_core::{
    async_trait, ContentError, ContentGenerator, ContentRequest, GeneratedContent,
};

/// A generator that fails every call with the same kind of error.
///
/// Useful for testing partial-failure isolation in the dispatch loop.
#[derive(Debug)]
pub struct FailingGenerator {
    message: String,
    transient: bool,
    calls: AtomicUsize,
}

impl FailingGenerator {
    /// Fail every call with a transient `Unavailable` error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with a permanent `InvalidResponse` error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transient: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for FailingGenerator {
    async fn generate(&self, _request: ContentRequest) -> Result<GeneratedContent, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.transient {
            Err(ContentError::Unavailable(self.message.clone()))
        } else {
            Err(ContentError::InvalidResponse(self.message.clone()))
        }
    }

    fn name(&self) -> &str {
        "FailingGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::{NotificationCategory, NotificationFamily};

    fn request() -> ContentRequest {
        ContentRequest {
            user_id: "user-1".to_string(),
            family: NotificationFamily::Companion,
            category: NotificationCategory::Morning,
            context: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_unavailable_is_transient() {
        let generator = FailingGenerator::unavailable("down for maintenance");
        let err = generator.generate(request()).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_invalid_is_permanent() {
        let generator = FailingGenerator::invalid("not json");
        let err = generator.generate(request()).await.unwrap_err();
        assert!(!err.is_transient());
    }
}
