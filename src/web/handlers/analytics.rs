use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::analytics::{
    session_stats, speaking_time, streaks, ConversationEvent, Period, SessionStats,
    SpeakingTimeStats, StreakStats,
};
use crate::storage::conversation::MessageRow;
use crate::utils::http::{error_response, ApiData, ApiError};
use crate::AppContext;

use super::chat::resolve_user;

pub fn analytics_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/analytics/stats", get(stats))
        .with_state(ctx)
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    period: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyticsData {
    speaking_time: SpeakingTimeStats,
    streaks: StreakStats,
    sessions: SessionStats,
}

async fn stats(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
    Query(query): Query<StatsQuery>,
) -> Response {
    let user_id = match resolve_user(&ctx, &headers).await {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };

    let period = match query.period.as_deref() {
        None => Period::All,
        Some(raw) => match Period::parse(raw) {
            Some(period) => period,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ApiError::new(format!("Invalid period {:?}", raw)),
                )
            }
        },
    };

    let cutoff = period.cutoff(Utc::now());
    let result = tokio::try_join!(
        ctx.conversations.list_for_user(&user_id, cutoff, false),
        ctx.conversations.list_for_user(&user_id, None, false),
        ctx.conversations.list_for_user(&user_id, None, true),
    );

    let (period_rows, all_rows, newest_first_rows) = match result {
        Ok(rows) => rows,
        Err(e) => {
            error!("failed to load conversation records for {}: {}", user_id, e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("Failed to load analytics data"),
            );
        }
    };

    let data = AnalyticsData {
        speaking_time: speaking_time(&to_events(&period_rows)),
        streaks: streaks(&to_events(&all_rows)),
        sessions: session_stats(&to_events(&newest_first_rows)),
    };

    Json(ApiData::new(data)).into_response()
}

fn to_events(rows: &[MessageRow]) -> Vec<ConversationEvent> {
    rows.iter()
        .map(|row| ConversationEvent {
            timestamp: row.created_at,
            role: row.role,
            session_id: row.session_id.clone(),
            character_name: row.character_name.clone(),
        })
        .collect()
}
