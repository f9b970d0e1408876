//! Flaky generator - fails a few times, then succeeds.

use std::sync::atomic::{AtomicUsize, Ordering};

use companion_core::{
    async_trait, ContentError, ContentGenerator, ContentRequest, GeneratedContent,
};

/// A generator that fails its first `fail_times` calls with a transient
/// rate-limit error, then succeeds with fixed content.
///
/// Useful for exercising retry policies.
#[derive(Debug)]
pub struct FlakyGenerator {
    fail_times: usize,
    title: String,
    body: String,
    calls: AtomicUsize,
}

impl FlakyGenerator {
    /// Create a generator that rate-limits the first `fail_times` calls.
    pub fn rate_limited(fail_times: usize) -> Self {
        Self {
            fail_times,
            title: "After the storm".to_string(),
            body: "Persistence pays off.".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generate calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for FlakyGenerator {
    async fn generate(&self, _request: ContentRequest) -> Result<GeneratedContent, ContentError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            Err(ContentError::RateLimited(format!("call {} throttled", call + 1)))
        } else {
            Ok(GeneratedContent {
                title: self.title.clone(),
                body: self.body.clone(),
            })
        }
    }

    fn name(&self) -> &str {
        "FlakyGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use companion_core::{retry_transient, NotificationCategory, NotificationFamily, RetryConfig};
    use std::time::Duration;

    fn request() -> ContentRequest {
        ContentRequest {
            user_id: "user-1".to_string(),
            family: NotificationFamily::Companion,
            category: NotificationCategory::Suggestion,
            context: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_fails_then_succeeds() {
        let generator = FlakyGenerator::rate_limited(2);

        assert!(generator.generate(request()).await.is_err());
        assert!(generator.generate(request()).await.is_err());
        assert!(generator.generate(request()).await.is_ok());
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_recovers_under_retry() {
        let generator = FlakyGenerator::rate_limited(2);
        let config = RetryConfig {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            ..RetryConfig::default()
        };

        let content = retry_transient(&config, || generator.generate(request()))
            .await
            .unwrap();
        assert_eq!(content.title, "After the storm");
        assert_eq!(generator.calls(), 3);
    }
}
