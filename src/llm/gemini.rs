use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::analytics::Role;

use super::{classify_api_error, normalize_history, ChatEngine, ChatTurn, LlmError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Models tried in order. The list only advances when a failure looks
/// like the model itself is unsupported; every other error aborts.
const MODEL_FALLBACKS: &[&str] = &["gemini-2.5-flash", "gemini-2.5-flash-lite", "gemini-2.0-flash"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Google Gemini chat backend.
pub struct GeminiChat {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiChat {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn generate_with_model(
        &self,
        model: &str,
        api_key: &str,
        system_instruction: &str,
        history: &[ChatTurn],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let request = GenerateRequest {
            contents: history.iter().map(to_content).collect(),
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction.to_string(),
                }],
            },
            generation_config: GenerationConfig { temperature },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("gemini request to {} failed with {}: {}", model, status, body);
            return Err(classify_api_error(&body));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("unreadable response: {}", e)))?;

        let text = extract_text(&parsed);
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl ChatEngine for GeminiChat {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[ChatTurn],
        temperature: f32,
    ) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("GEMINI_API_KEY is not set".to_string()))?;

        let history = normalize_history(history);

        let mut last_err = LlmError::EmptyResponse;
        for model in MODEL_FALLBACKS {
            match self
                .generate_with_model(model, api_key, system_instruction, &history, temperature)
                .await
            {
                Ok(text) => return Ok(text),
                Err(LlmError::ModelNotFound(detail)) => {
                    warn!("model {} unavailable, trying next fallback: {}", model, detail);
                    last_err = LlmError::ModelNotFound(detail);
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err)
    }
}

fn to_content(turn: &ChatTurn) -> Content {
    let role = match turn.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    Content {
        role: Some(role.to_string()),
        parts: vec![Part {
            text: turn.text.clone(),
        }],
    }
}

/// Pull the first candidate's text, joining multi-part content. Missing
/// or empty candidates yield an empty string for the caller to reject.
fn extract_text(response: &GenerateResponse) -> String {
    let Some(candidate) = response.candidates.first() else {
        return String::new();
    };
    let Some(content) = candidate.content.as_ref() else {
        return String::new();
    };
    content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_multi_part_candidate() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Nice try!"},{"text":"Here is a fix."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response), "Nice try! Here is a fix.");
    }

    #[test]
    fn missing_candidates_yield_empty_text() {
        let response: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(extract_text(&response), "");

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn roles_map_to_gemini_vocabulary() {
        let content = to_content(&ChatTurn {
            role: Role::Assistant,
            text: "hi".to_string(),
        });
        assert_eq!(content.role.as_deref(), Some("model"));
    }

    #[tokio::test]
    async fn missing_api_key_is_not_configured() {
        let engine = GeminiChat::new(None).with_base_url("http://127.0.0.1:1".to_string());
        let err = engine.generate("inst", &[], 0.8).await.unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }
}
