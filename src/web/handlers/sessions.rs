use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::analytics::Role;
use crate::storage::conversation::MessageRow;
use crate::utils::http::{error_response, ApiData, ApiError};
use crate::AppContext;

use super::chat::resolve_user;

pub fn session_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/messages", post(save_message))
        .route("/sessions", get(list_sessions))
        .route("/sessions/:session_id/messages", get(session_messages))
        .with_state(ctx)
}

#[derive(Debug, Deserialize)]
struct SaveMessageRequest {
    session_id: String,
    character_name: Option<String>,
    role: Option<String>,
    content: String,
}

async fn save_message(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    body: Option<Json<SaveMessageRequest>>,
) -> Response {
    let user_id = match resolve_user(&ctx, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let Some(Json(request)) = body else {
        return error_response(StatusCode::BAD_REQUEST, ApiError::new("Invalid request body"));
    };
    let content = request.content.trim();
    if request.session_id.is_empty() || content.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            ApiError::new("session_id and content are required"),
        );
    }

    let row = MessageRow {
        user_id,
        session_id: request.session_id,
        character_name: request.character_name,
        role: match request.role.as_deref() {
            Some("user") => Role::User,
            _ => Role::Assistant,
        },
        content: content.to_string(),
        created_at: Utc::now(),
    };

    match ctx.conversations.insert(&row).await {
        Ok(()) => (StatusCode::CREATED, Json(ApiData::new(()))).into_response(),
        Err(e) => {
            error!("failed to save message: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Failed to save message"),
            )
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionEntry {
    session_id: String,
    character_name: Option<String>,
    started_at: DateTime<Utc>,
    message_count: u64,
}

async fn list_sessions(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> Response {
    let user_id = match resolve_user(&ctx, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let rows = match ctx.conversations.list_for_user(&user_id, None, false).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("failed to list sessions for {}: {}", user_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Failed to load sessions"),
            );
        }
    };

    // Rows arrive oldest first, so the first row seen per session
    // carries its start time.
    let mut sessions: Vec<SessionEntry> = Vec::new();
    for row in rows {
        match sessions.iter_mut().find(|s| s.session_id == row.session_id) {
            Some(entry) => entry.message_count += 1,
            None => sessions.push(SessionEntry {
                session_id: row.session_id,
                character_name: row.character_name,
                started_at: row.created_at,
                message_count: 1,
            }),
        }
    }
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));

    Json(ApiData::new(sessions)).into_response()
}

#[derive(Debug, Serialize)]
struct SessionMessage {
    role: Role,
    text: String,
}

async fn session_messages(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Path(session_id): Path<String>,
) -> Response {
    let user_id = match resolve_user(&ctx, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    match ctx.conversations.list_session_messages(&user_id, &session_id).await {
        Ok(rows) => {
            let messages: Vec<SessionMessage> = rows
                .into_iter()
                .map(|row| SessionMessage {
                    role: row.role,
                    text: row.content,
                })
                .collect();
            Json(ApiData::new(messages)).into_response()
        }
        Err(e) => {
            error!("failed to load session {} for {}: {}", session_id, user_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Failed to load session messages"),
            )
        }
    }
}
