use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::Role;

pub mod gemini;
pub mod openai;

pub use gemini::GeminiChat;
pub use openai::RealtimeTokenClient;

/// Upstream conversation history is truncated to this many turns.
pub const MAX_HISTORY_TURNS: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("authentication rejected by provider")]
    Auth,

    #[error("provider quota exhausted")]
    Quota,

    #[error("permission denied by provider")]
    Permission,

    #[error("model not available: {0}")]
    ModelNotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("empty generation result")]
    EmptyResponse,

    #[error("api error: {0}")]
    Api(String),
}

impl LlmError {
    /// User-facing message, one per error class. Internal provider
    /// detail stays in the logs and never reaches the client.
    pub fn user_message(&self) -> &'static str {
        match self {
            LlmError::NotConfigured(_) => "The chat service is not configured.",
            LlmError::Auth => "The chat service rejected our credentials. Please try again later.",
            LlmError::Quota => "The chat service is over its usage quota. Please try again later.",
            LlmError::Permission => "The chat service denied the request.",
            LlmError::ModelNotFound(_) => "The requested chat model is unavailable.",
            LlmError::Network(_) => "Could not reach the chat service. Check your connection and try again.",
            LlmError::EmptyResponse => "No response was generated. Please try again.",
            LlmError::Api(_) => "The chat service failed. Please try again.",
        }
    }
}

/// Classify an upstream error body by its known substrings.
pub fn classify_api_error(detail: &str) -> LlmError {
    let lower = detail.to_lowercase();

    if lower.contains("api key") || lower.contains("api_key") || lower.contains("unauthorized") {
        LlmError::Auth
    } else if lower.contains("quota") || lower.contains("resource_exhausted") {
        LlmError::Quota
    } else if lower.contains("permission") {
        LlmError::Permission
    } else if lower.contains("not found") || lower.contains("not supported") {
        LlmError::ModelNotFound(truncate(detail, 120))
    } else if lower.contains("network") || lower.contains("connection") || lower.contains("timed out")
    {
        LlmError::Network(truncate(detail, 120))
    } else {
        LlmError::Api(truncate(detail, 200))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Drop empty turns and keep only the most recent `MAX_HISTORY_TURNS`.
pub fn normalize_history(turns: &[ChatTurn]) -> Vec<ChatTurn> {
    let kept: Vec<ChatTurn> = turns
        .iter()
        .filter(|t| !t.text.trim().is_empty())
        .cloned()
        .collect();
    let skip = kept.len().saturating_sub(MAX_HISTORY_TURNS);
    kept.into_iter().skip(skip).collect()
}

#[async_trait]
pub trait ChatEngine: Send + Sync {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        temperature: f32,
    ) -> Result<String, LlmError>;
}
