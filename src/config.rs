use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7300";
const DEFAULT_SQLITE_PATH: &str = "sqlite://./tutor_data/database/storage.db?mode=rwc";
const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 20;
const DEFAULT_DAILY_MESSAGE_LIMIT: u32 = 200;

/// A configurable ceiling. A limit env var that is set but unparseable
/// (or zero) degrades to `Unlimited` so a typo in deployment config can
/// never reject all traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Limit {
    Limited(u32),
    Unlimited,
}

impl Limit {
    /// Unset values take the default; values that are set but not a
    /// positive integer disable the limit.
    pub fn parse(raw: Option<&str>, default: u32) -> Self {
        match raw {
            None => Limit::Limited(default),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => Limit::Limited(n),
                _ => Limit::Unlimited,
            },
        }
    }

    pub fn from_env(var: &str, default: u32) -> Self {
        let raw = env::var(var).ok();
        let limit = Self::parse(raw.as_deref(), default);
        if limit == Limit::Unlimited {
            if let Some(raw) = raw {
                warn!("{} = {:?} is not a positive integer, limit disabled", var, raw);
            }
        }
        limit
    }

    pub fn allows(&self, count: u64) -> bool {
        match self {
            Limit::Limited(max) => count < u64::from(*max),
            Limit::Unlimited => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: Limit,
}

impl RateLimitConfig {
    /// Seconds until a freshly started window expires, used as the
    /// `Retry-After` hint on 429 responses.
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.window.as_millis().div_ceil(1000) as u64;
        if secs == 0 {
            60
        } else {
            secs
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub sqlite_path: String,
    pub rate_limit: RateLimitConfig,
    pub daily_limit: Limit,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = env::var("TUTOR_BIND_ADDR")
            .ok()
            .and_then(|raw| {
                raw.parse::<SocketAddr>()
                    .map_err(|e| warn!("TUTOR_BIND_ADDR = {:?} is invalid: {}", raw, e))
                    .ok()
            })
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.parse().expect("default bind addr"));

        // A window that is set but unparseable disables the rate limit
        // entirely, matching the fail-open policy of `Limit`.
        let (window_ms, window_valid) = match env::var("RATE_LIMIT_WINDOW_MS") {
            Err(_) => (DEFAULT_RATE_LIMIT_WINDOW_MS, true),
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => (ms, true),
                _ => {
                    warn!("RATE_LIMIT_WINDOW_MS = {:?} is not a positive integer, rate limit disabled", raw);
                    (DEFAULT_RATE_LIMIT_WINDOW_MS, false)
                }
            },
        };
        let max_requests = if window_valid {
            Limit::from_env("RATE_LIMIT_MAX_REQUESTS", DEFAULT_RATE_LIMIT_MAX_REQUESTS)
        } else {
            Limit::Unlimited
        };

        Self {
            bind_addr,
            sqlite_path: env::var("TUTOR_SQLITE_PATH")
                .unwrap_or_else(|_| DEFAULT_SQLITE_PATH.to_string()),
            rate_limit: RateLimitConfig {
                window: Duration::from_millis(window_ms),
                max_requests,
            },
            daily_limit: Limit::from_env("DAILY_MESSAGE_LIMIT", DEFAULT_DAILY_MESSAGE_LIMIT),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .or_else(|_| env::var("GOOGLE_API_KEY"))
                .ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").ok(),
        }
    }
}
