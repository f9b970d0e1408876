//! Delayed generator - wraps another generator with artificial delay.

use std::time::Duration;

use companion_core::{
    async_trait, ContentError, ContentGenerator, ContentRequest, GeneratedContent,
};
use tokio::time::sleep;

/// A generator that adds a fixed delay before delegating.
///
/// Useful for testing per-user generation timeouts.
pub struct DelayedGenerator<G: ContentGenerator> {
    inner: G,
    delay: Duration,
}

impl<G: ContentGenerator> DelayedGenerator<G> {
    /// Wrap `inner`, sleeping `delay` before each call.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Wrap with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<G: ContentGenerator> ContentGenerator for DelayedGenerator<G> {
    async fn generate(&self, request: ContentRequest) -> Result<GeneratedContent, ContentError> {
        sleep(self.delay).await;
        self.inner.generate(request).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedGenerator;
    use companion_core::{NotificationCategory, NotificationFamily};
    use std::time::Instant;

    fn request() -> ContentRequest {
        ContentRequest {
            user_id: "user-1".to_string(),
            family: NotificationFamily::Companion,
            category: NotificationCategory::Morning,
            context: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_delays_before_delegating() {
        let generator = DelayedGenerator::with_millis(FixedGenerator::new("T", "B"), 50);

        let start = Instant::now();
        let content = generator.generate(request()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(content.title, "T");
    }

    #[tokio::test]
    async fn test_times_out_under_wrapper() {
        let generator = DelayedGenerator::with_millis(FixedGenerator::new("T", "B"), 200);

        let result =
            tokio::time::timeout(Duration::from_millis(20), generator.generate(request())).await;
        assert!(result.is_err());
    }
}
