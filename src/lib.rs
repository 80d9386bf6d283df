pub mod analytics;
pub mod auth;
pub mod config;
pub mod content;
pub mod llm;
pub mod quota;
pub mod storage;
pub mod utils;
pub mod web;

use std::sync::Arc;

use auth::TokenVerifier;
use llm::{ChatEngine, RealtimeTokenClient};
use quota::QuotaTracker;
use storage::conversation::ConversationStorage;

pub struct AppContext {
    pub quota: Arc<QuotaTracker>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub chat: Arc<dyn ChatEngine>,
    pub realtime: Arc<RealtimeTokenClient>,
    pub conversations: Arc<dyn ConversationStorage>,
}

pub fn init_env() {
    dotenv::dotenv().ok();

    // Make sure the database directory exists before sqlx connects.
    let url = std::env::var("TUTOR_SQLITE_PATH")
        .unwrap_or_else(|_| "sqlite://./tutor_data/database/storage.db?mode=rwc".to_string());
    if let Some(path) = url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(dir) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(dir).unwrap_or_else(|e| {
                eprintln!("Failed to create database directory: {}", e);
            });
        }
    }
}
