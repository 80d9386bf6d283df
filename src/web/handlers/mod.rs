use axum::Router;
use std::sync::Arc;
use crate::AppContext;

pub mod analytics;
pub mod chat;
pub mod realtime;
pub mod sessions;

pub fn router(ctx: Arc<AppContext>) -> Router {
    let api = Router::new()
        .merge(chat::chat_router(ctx.clone()))
        .merge(realtime::realtime_router(ctx.clone()))
        .merge(analytics::analytics_router(ctx.clone()))
        .merge(sessions::session_router(ctx));

    Router::new().nest("/api", api)
}
