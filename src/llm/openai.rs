use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::LlmError;

const CLIENT_SECRETS_URL: &str = "https://api.openai.com/v1/realtime/client_secrets";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const REALTIME_MODEL: &str = "gpt-realtime";

/// Instructions baked into every realtime session: correct, paraphrase,
/// then continue the conversation.
const SESSION_INSTRUCTIONS: &str = "You are a friendly English conversation teacher for intermediate learners. \
Every time the student speaks you must (1) gently correct grammar and spelling mistakes, \
(2) offer a more natural paraphrase of their sentence, and (3) continue the conversation naturally. \
Speak clearly at a moderate pace, use B1-B2 vocabulary, keep each part concise, and always be encouraging. \
Start by greeting the student warmly and asking what they'd like to talk about today.";

#[derive(Debug, Deserialize)]
struct ClientSecretResponse {
    value: String,
}

/// Mints short-lived client tokens for the browser to open an OpenAI
/// realtime voice session directly.
pub struct RealtimeTokenClient {
    client: Client,
    api_key: Option<String>,
    url: String,
}

impl RealtimeTokenClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            url: CLIENT_SECRETS_URL.to_string(),
        }
    }

    pub async fn mint_token(&self, voice: &str) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

        let session_config = json!({
            "session": {
                "type": "realtime",
                "model": REALTIME_MODEL,
                "audio": { "output": { "voice": voice } },
                "instructions": SESSION_INSTRUCTIONS,
            }
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&session_config)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("realtime token request failed with {}: {}", status, body);
            return Err(super::classify_api_error(&body));
        }

        let secret: ClientSecretResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("unreadable response: {}", e)))?;
        Ok(secret.value)
    }
}
