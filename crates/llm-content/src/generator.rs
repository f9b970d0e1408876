//! The generator implementation.

use companion_core::{
    async_trait, ContentError, ContentGenerator, ContentRequest, GeneratedContent,
    NotificationCategory, NotificationFamily,
};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::LlmContentConfig;

/// A content generator backed by an OpenAI-compatible chat API.
pub struct LlmContentGenerator {
    client: reqwest::Client,
    config: LlmContentConfig,
}

impl LlmContentGenerator {
    /// Create a generator with the given configuration.
    pub fn new(config: LlmContentConfig) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ContentError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a generator from environment variables.
    ///
    /// See [`LlmContentConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, ContentError> {
        Self::new(LlmContentConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &LlmContentConfig {
        &self.config
    }

    fn build_request(&self, request: &ContentRequest) -> ChatCompletionRequest {
        let messages = vec![
            ChatMessage::system(system_prompt(request.family, request.category)),
            ChatMessage::user(format!(
                "User context:\n{}",
                serde_json::to_string_pretty(&request.context).unwrap_or_else(|_| "{}".to_string())
            )),
        ];

        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, request: ContentRequest) -> Result<GeneratedContent, ContentError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );
        let body = self.build_request(&request);

        debug!(
            user_id = %request.user_id,
            category = request.category.as_str(),
            model = %self.config.model,
            "Requesting content generation"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ContentError::Timeout
                } else {
                    ContentError::Unavailable(format!("request failed: {e}"))
                }
            })?;

        let status = response.status();
        if let Err(err) = check_status(status) {
            warn!(status = %status, "Content API returned an error status");
            return Err(err);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ContentError::InvalidResponse(format!("response not JSON: {e}")))?;

        let text = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ContentError::InvalidResponse("no content in response".to_string()))?;

        parse_generated(&text)
    }

    fn name(&self) -> &str {
        "LlmContentGenerator"
    }
}

/// Map an HTTP status into the seam's error taxonomy, or pass on success.
fn check_status(status: StatusCode) -> Result<(), ContentError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ContentError::RateLimited(format!("HTTP {status}")));
    }
    if status.is_server_error() {
        return Err(ContentError::Unavailable(format!("HTTP {status}")));
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ContentError::Configuration(format!("HTTP {status}")));
    }
    Err(ContentError::InvalidResponse(format!("HTTP {status}")))
}

/// Parse the model's reply into notification content.
///
/// Expects a JSON object `{"title": ..., "body": ...}`, tolerating a
/// fenced code block wrapper.
fn parse_generated(text: &str) -> Result<GeneratedContent, ContentError> {
    let stripped = strip_code_fence(text.trim());

    let content: GeneratedContent = serde_json::from_str(stripped)
        .map_err(|e| ContentError::InvalidResponse(format!("content not in expected shape: {e}")))?;

    if content.title.trim().is_empty() || content.body.trim().is_empty() {
        return Err(ContentError::InvalidResponse(
            "empty title or body".to_string(),
        ));
    }
    Ok(content)
}

/// Remove a surrounding Markdown code fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.strip_suffix("```").map(str::trim).unwrap_or(text)
}

fn system_prompt(family: NotificationFamily, category: NotificationCategory) -> String {
    let persona = match family {
        NotificationFamily::Companion => {
            "You are a warm, encouraging faith companion writing a short check-in"
        }
        NotificationFamily::Nutrition => {
            "You are a friendly nutrition guide writing a short meal suggestion"
        }
        NotificationFamily::Coaching => {
            "You are a supportive fitness coach writing a short encouragement"
        }
    };
    let occasion = match category {
        NotificationCategory::Morning => "for the start of the user's day",
        NotificationCategory::Midday => "for a midday pause",
        NotificationCategory::Afternoon => "for an afternoon reset",
        NotificationCategory::Evening => "for winding down in the evening",
        NotificationCategory::DailyReflection => "inviting the user to reflect on their day",
        NotificationCategory::Suggestion => "proposing one concrete thing to try",
        NotificationCategory::WeeklySummary => "summarizing the user's week of growth",
        NotificationCategory::MonthlyReport => "reviewing the user's month of progress",
    };

    format!(
        "{persona} {occasion}. Keep it under 60 words. Respond with only a JSON \
         object of the form {{\"title\": \"...\", \"body\": \"...\"}}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let content = parse_generated(r#"{"title": "Good morning", "body": "Start fresh."}"#).unwrap();
        assert_eq!(content.title, "Good morning");
        assert_eq!(content.body, "Start fresh.");
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"title\": \"T\", \"body\": \"B\"}\n```";
        let content = parse_generated(text).unwrap();
        assert_eq!(content.title, "T");
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let result = parse_generated("Here's a nice notification for you!");
        assert!(matches!(result, Err(ContentError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_rejects_empty_fields() {
        let result = parse_generated(r#"{"title": "", "body": "B"}"#);
        assert!(matches!(result, Err(ContentError::InvalidResponse(_))));
    }

    #[test]
    fn test_status_mapping() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_status(StatusCode::TOO_MANY_REQUESTS),
            Err(ContentError::RateLimited(_))
        ));
        assert!(matches!(
            check_status(StatusCode::SERVICE_UNAVAILABLE),
            Err(ContentError::Unavailable(_))
        ));
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED),
            Err(ContentError::Configuration(_))
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_REQUEST),
            Err(ContentError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_system_prompt_varies_by_family_and_category() {
        let companion = system_prompt(NotificationFamily::Companion, NotificationCategory::Morning);
        let coach = system_prompt(NotificationFamily::Coaching, NotificationCategory::Morning);
        assert_ne!(companion, coach);

        let weekly =
            system_prompt(NotificationFamily::Companion, NotificationCategory::WeeklySummary);
        assert!(weekly.contains("week"));
    }
}
