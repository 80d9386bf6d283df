use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::analytics::Role;
use crate::auth::{bearer_token, AuthError};
use crate::content::{compose_instruction, get_character, is_valid_character, is_valid_level, get_level};
use crate::llm::{ChatTurn, LlmError};
use crate::utils::http::{error_response, ApiError};
use crate::AppContext;

const CHAT_TEMPERATURE: f32 = 0.8;
const MAX_SCENARIO_CHARS: usize = 200;

pub fn chat_router(ctx: Arc<AppContext>) -> Router {
    Router::new().route("/chat", post(chat)).with_state(ctx)
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub character: Option<String>,
    pub voice: Option<String>,
    pub level: Option<String>,
    pub scenario: Option<String>,
    #[serde(default)]
    pub messages: Vec<IncomingMessage>,
}

/// Tolerant message shape: anything without a known role and non-empty
/// text is dropped rather than rejected.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    pub role: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterInfo {
    pub name: &'static str,
    pub emoji: &'static str,
    pub mbti: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub voice: &'static str,
    pub character: CharacterInfo,
}

/// Best client identity available for rate limiting, in order of trust.
pub(crate) fn client_key(headers: &HeaderMap) -> String {
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
        return "unknown".to_string();
    }
    if let Some(ip) = header_str(headers, "cf-connecting-ip") {
        return ip.to_string();
    }
    if let Some(ip) = header_str(headers, "x-real-ip") {
        return ip.to_string();
    }
    "anonymous".to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Normalize request fields, falling back to documented defaults for
/// anything optional that is missing or out of range.
pub(crate) fn normalize_request(req: ChatRequest) -> (&'static str, &'static str, Option<String>, Vec<ChatTurn>) {
    let character_id = req
        .character
        .or(req.voice)
        .filter(|id| is_valid_character(id))
        .map(|id| get_character(&id).id)
        .unwrap_or(crate::content::DEFAULT_CHARACTER_ID);

    let level_id = req
        .level
        .filter(|id| is_valid_level(id))
        .map(|id| get_level(&id).id)
        .unwrap_or(crate::content::DEFAULT_LEVEL_ID);

    let scenario = req.scenario.and_then(|s| {
        let trimmed = s.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.chars().take(MAX_SCENARIO_CHARS).collect())
        }
    });

    let history: Vec<ChatTurn> = req
        .messages
        .into_iter()
        .filter_map(|m| {
            let role = match m.role.as_deref() {
                Some("user") => Role::User,
                Some("assistant") => Role::Assistant,
                _ => return None,
            };
            let text = m.text?.trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(ChatTurn { role, text })
        })
        .collect();

    (character_id, level_id, scenario, history)
}

async fn chat(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Option<Json<ChatRequest>>,
) -> Response {
    let client = client_key(&headers);
    if !ctx.quota.admit_rate_limit(&client) {
        return too_many_requests(
            "Rate limit exceeded",
            ctx.quota.rate_limit().retry_after_secs(),
        );
    }

    let user_id = match resolve_user(&ctx, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    if !ctx.quota.admit_daily_quota(&user_id) {
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            ApiError::with_message(
                "Daily message limit reached",
                "You have used up today's practice messages. Come back tomorrow!",
            ),
        );
    }

    let request = match body {
        Some(Json(request)) => request,
        None => {
            warn!("invalid chat request body, using defaults");
            ChatRequest::default()
        }
    };
    let (character_id, level_id, scenario, history) = normalize_request(request);

    let character = get_character(character_id);
    let level = get_level(level_id);
    let instruction = compose_instruction(character, level, scenario.as_deref());

    match ctx.chat.generate(&instruction, &history, CHAT_TEMPERATURE).await {
        Ok(text) => {
            // The quota check above and this record straddle the provider
            // await, so concurrent requests can overshoot the daily limit
            // slightly. Accepted slack for process-local counters.
            ctx.quota.record_daily_usage(&user_id);
            Json(ChatResponse {
                text,
                voice: character.voice,
                character: CharacterInfo {
                    name: character.label,
                    emoji: character.emoji,
                    mbti: character.mbti,
                },
            })
            .into_response()
        }
        Err(e) => {
            error!("chat generation failed: {}", e);
            let status = match e {
                LlmError::EmptyResponse | LlmError::Network(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            error_response(
                status,
                ApiError::with_message("Chat generation failed", e.user_message()),
            )
        }
    }
}

pub(crate) async fn resolve_user(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<String, Response> {
    let token = bearer_token(header_str(headers, "authorization"))
        .map_err(|e| error_response(StatusCode::UNAUTHORIZED, ApiError::new(e.to_string())))?;

    ctx.verifier.resolve_user(token).await.map_err(|e| match e {
        AuthError::Upstream(detail) => {
            error!("token verification unavailable: {}", detail);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Authentication service unavailable"),
            )
        }
        _ => error_response(StatusCode::UNAUTHORIZED, ApiError::new(e.to_string())),
    })
}

fn too_many_requests(reason: &str, retry_after_secs: u64) -> Response {
    let mut response = error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ApiError::with_message(
            reason,
            format!("Too many requests. Try again in {} seconds.", retry_after_secs),
        ),
    );
    if let Ok(value) = retry_after_secs.to_string().parse() {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn client_key_prefers_forwarded_for_first_entry() {
        let map = headers(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "10.0.0.9"),
        ]);
        assert_eq!(client_key(&map), "10.0.0.1");
    }

    #[test]
    fn client_key_falls_back_through_headers() {
        assert_eq!(client_key(&headers(&[("cf-connecting-ip", "1.1.1.1")])), "1.1.1.1");
        assert_eq!(client_key(&headers(&[("x-real-ip", "2.2.2.2")])), "2.2.2.2");
        assert_eq!(client_key(&headers(&[])), "anonymous");
    }

    #[test]
    fn empty_forwarded_for_is_unknown() {
        assert_eq!(client_key(&headers(&[("x-forwarded-for", " ")])), "unknown");
    }

    #[test]
    fn normalize_falls_back_to_defaults() {
        let (character, level, scenario, history) = normalize_request(ChatRequest {
            character: Some("not-a-character".to_string()),
            voice: None,
            level: Some("superhuman".to_string()),
            scenario: None,
            messages: vec![],
        });
        assert_eq!(character, "alloy");
        assert_eq!(level, "intermediate");
        assert!(scenario.is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn normalize_accepts_voice_as_character_alias() {
        let (character, _, _, _) = normalize_request(ChatRequest {
            character: None,
            voice: Some("ash".to_string()),
            ..Default::default()
        });
        assert_eq!(character, "ash");
    }

    #[test]
    fn normalize_drops_malformed_messages() {
        let (_, _, _, history) = normalize_request(ChatRequest {
            messages: vec![
                IncomingMessage {
                    role: Some("user".to_string()),
                    text: Some("hello".to_string()),
                },
                IncomingMessage {
                    role: Some("system".to_string()),
                    text: Some("ignored".to_string()),
                },
                IncomingMessage {
                    role: Some("assistant".to_string()),
                    text: Some("  ".to_string()),
                },
                IncomingMessage {
                    role: None,
                    text: Some("no role".to_string()),
                },
            ],
            ..Default::default()
        });
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "hello");
    }

    #[test]
    fn normalize_truncates_long_scenarios() {
        let (_, _, scenario, _) = normalize_request(ChatRequest {
            scenario: Some("x".repeat(500)),
            ..Default::default()
        });
        assert_eq!(scenario.unwrap().len(), MAX_SCENARIO_CHARS);
    }
}
