//! Fixed generator - always returns the same content.

use std::sync::atomic::{AtomicUsize, Ordering};

use companion_core::{
    async_trait, ContentError, ContentGenerator, ContentRequest, GeneratedContent,
};

/// A generator that returns the same content for every request.
///
/// Counts calls so tests can assert how often generation actually ran.
#[derive(Debug, Default)]
pub struct FixedGenerator {
    title: String,
    body: String,
    calls: AtomicUsize,
}

impl FixedGenerator {
    /// Create a generator with the given title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A generic placeholder suitable for local runs.
    pub fn placeholder() -> Self {
        Self::new("A moment for you", "Take a breath and check in with yourself today.")
    }

    /// Number of generate calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentGenerator for FixedGenerator {
    async fn generate(&self, _request: ContentRequest) -> Result<GeneratedContent, ContentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedContent {
            title: self.title.clone(),
            body: self.body.clone(),
        })
    }

    fn name(&self) -> &str {
        "FixedGenerator"
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
    async fn test_returns_fixed_content_and_counts() {
        let generator = FixedGenerator::new("Title", "Body");

        let content = generator.generate(request()).await.unwrap();
        assert_eq!(content.title, "Title");
        assert_eq!(content.body, "Body");

        generator.generate(request()).await.unwrap();
        assert_eq!(generator.calls(), 2);
    }
}
