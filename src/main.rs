use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use tutor_rs::auth::SupabaseVerifier;
use tutor_rs::config::Config;
use tutor_rs::llm::{GeminiChat, RealtimeTokenClient};
use tutor_rs::quota::{InMemoryQuotaStore, QuotaTracker};
use tutor_rs::storage::conversation::sqlite::SqliteConversationStorage;
use tutor_rs::utils::logger;
use tutor_rs::{init_env, AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    init_env();
    let _guard = logger::init("./logs".to_string())?;

    info!("Starting tutor service...");
    let config = Config::from_env();

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, chat generation will be unavailable");
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set, realtime sessions will be unavailable");
    }

    info!("Initializing Storage...");
    let conversations = SqliteConversationStorage::new(&config.sqlite_path).await?;

    info!("Initializing Quota Tracker...");
    let quota = QuotaTracker::new(
        Arc::new(InMemoryQuotaStore::new()),
        config.rate_limit.clone(),
        config.daily_limit,
    );

    let verifier = match (&config.supabase_url, &config.supabase_anon_key) {
        (Some(url), Some(key)) => SupabaseVerifier::new(url.clone(), key.clone()),
        _ => anyhow::bail!("SUPABASE_URL and SUPABASE_ANON_KEY must be set"),
    };

    let ctx = Arc::new(AppContext {
        quota: Arc::new(quota),
        verifier: Arc::new(verifier),
        chat: Arc::new(GeminiChat::new(config.gemini_api_key.clone())),
        realtime: Arc::new(RealtimeTokenClient::new(config.openai_api_key.clone())),
        conversations: Arc::new(conversations),
    });

    info!("Starting HTTP server at http://{}", config.bind_addr);
    match tutor_rs::web::start_server(ctx, config.bind_addr).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            tracing::error!("Server error: {}", e);
            return Err(e);
        }
    }

    Ok(())
}
