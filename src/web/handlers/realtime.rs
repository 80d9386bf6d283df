use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::content::get_character;
use crate::llm::LlmError;
use crate::utils::http::{error_response, ApiError};
use crate::AppContext;

pub fn realtime_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/realtime/token", post(mint_token))
        .with_state(ctx)
}

#[derive(Debug, Default, Deserialize)]
struct TokenRequest {
    character: Option<String>,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    value: String,
}

/// Mint an ephemeral client token so the browser can open a realtime
/// voice session with the provider directly. The server-side API key
/// never leaves this process.
async fn mint_token(
    State(ctx): State<Arc<AppContext>>,
    body: Option<Json<TokenRequest>>,
) -> Response {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let character = get_character(request.character.as_deref().unwrap_or_default());

    match ctx.realtime.mint_token(character.voice).await {
        Ok(value) => Json(TokenResponse { value }).into_response(),
        Err(LlmError::NotConfigured(detail)) => {
            error!("realtime token unavailable: {}", detail);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("OPENAI_API_KEY is not set"),
            )
        }
        Err(e) => {
            error!("realtime token request failed: {}", e);
            error_response(
                StatusCode::BAD_GATEWAY,
                ApiError::with_message("Token request failed", e.user_message()),
            )
        }
    }
}
