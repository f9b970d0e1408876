//! LLM-backed content generator.
//!
//! Implements [`companion_core::ContentGenerator`] against an
//! OpenAI-compatible chat-completions API. The backend is asked to answer
//! with a JSON object `{"title": ..., "body": ...}`; rate limiting and
//! transport failures surface as transient [`companion_core::ContentError`]
//! variants so the dispatcher's retry policy applies.

mod api_types;
mod config;
mod generator;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use config::LlmContentConfig;
pub use generator::LlmContentGenerator;
