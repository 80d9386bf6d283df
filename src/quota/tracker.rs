use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::{Limit, RateLimitConfig};

use super::store::QuotaStore;

/// Admit/deny decisions for two independent limits: a fixed-window
/// request rate per client key and a per-user daily message ceiling.
///
/// Never returns an error: an `Unlimited` config or a failing store
/// degrades to "always admit" rather than rejecting traffic.
pub struct QuotaTracker {
    store: Arc<dyn QuotaStore>,
    rate_limit: RateLimitConfig,
    daily_limit: Limit,
}

impl QuotaTracker {
    pub fn new(store: Arc<dyn QuotaStore>, rate_limit: RateLimitConfig, daily_limit: Limit) -> Self {
        Self {
            store,
            rate_limit,
            daily_limit,
        }
    }

    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.rate_limit
    }

    pub fn admit_rate_limit(&self, client_key: &str) -> bool {
        self.admit_rate_limit_at(client_key, Utc::now())
    }

    pub(crate) fn admit_rate_limit_at(&self, client_key: &str, now: DateTime<Utc>) -> bool {
        let max_requests = match self.rate_limit.max_requests {
            Limit::Limited(max) => max,
            Limit::Unlimited => return true,
        };

        match self
            .store
            .take_window_slot(client_key, now, self.rate_limit.window, max_requests)
        {
            Ok(admitted) => admitted,
            Err(e) => {
                warn!("rate limit store failed for {}, admitting: {}", client_key, e);
                true
            }
        }
    }

    pub fn admit_daily_quota(&self, user_id: &str) -> bool {
        self.admit_daily_quota_on(user_id, &today())
    }

    pub(crate) fn admit_daily_quota_on(&self, user_id: &str, day: &str) -> bool {
        if self.daily_limit == Limit::Unlimited {
            return true;
        }

        match self.store.daily_count(user_id, day) {
            Ok(count) => self.daily_limit.allows(count),
            Err(e) => {
                warn!("daily quota store failed for {}, admitting: {}", user_id, e);
                true
            }
        }
    }

    pub fn record_daily_usage(&self, user_id: &str) {
        self.record_daily_usage_on(user_id, &today());
    }

    pub(crate) fn record_daily_usage_on(&self, user_id: &str, day: &str) {
        if let Err(e) = self.store.record_daily(user_id, day) {
            warn!("failed to record daily usage for {}: {}", user_id, e);
        }
    }
}

fn today() -> String {
    Utc::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::InMemoryQuotaStore;
    use chrono::Duration as ChronoDuration;
    use std::time::Duration;

    fn tracker(max_requests: Limit, daily: Limit) -> QuotaTracker {
        QuotaTracker::new(
            Arc::new(InMemoryQuotaStore::new()),
            RateLimitConfig {
                window: Duration::from_millis(60_000),
                max_requests,
            },
            daily,
        )
    }

    #[test]
    fn admits_up_to_max_then_denies() {
        let tracker = tracker(Limit::Limited(3), Limit::Unlimited);
        let now = Utc::now();

        assert!(tracker.admit_rate_limit_at("1.2.3.4", now));
        assert!(tracker.admit_rate_limit_at("1.2.3.4", now));
        assert!(tracker.admit_rate_limit_at("1.2.3.4", now));
        assert!(!tracker.admit_rate_limit_at("1.2.3.4", now));
        assert!(!tracker.admit_rate_limit_at("1.2.3.4", now));
    }

    #[test]
    fn window_fully_resets_after_expiry() {
        let tracker = tracker(Limit::Limited(2), Limit::Unlimited);
        let start = Utc::now();

        assert!(tracker.admit_rate_limit_at("key", start));
        assert!(tracker.admit_rate_limit_at("key", start));
        assert!(!tracker.admit_rate_limit_at("key", start));

        let later = start + ChronoDuration::milliseconds(60_000);
        assert!(tracker.admit_rate_limit_at("key", later));
        assert!(tracker.admit_rate_limit_at("key", later));
        assert!(!tracker.admit_rate_limit_at("key", later));
    }

    #[test]
    fn keys_are_limited_independently() {
        let tracker = tracker(Limit::Limited(1), Limit::Unlimited);
        let now = Utc::now();

        assert!(tracker.admit_rate_limit_at("a", now));
        assert!(!tracker.admit_rate_limit_at("a", now));
        assert!(tracker.admit_rate_limit_at("b", now));
    }

    #[test]
    fn unlimited_rate_limit_always_admits() {
        let tracker = tracker(Limit::Unlimited, Limit::Unlimited);
        let now = Utc::now();
        for _ in 0..100 {
            assert!(tracker.admit_rate_limit_at("key", now));
        }
    }

    #[test]
    fn daily_quota_admit_admit_deny_at_limit_two() {
        let tracker = tracker(Limit::Unlimited, Limit::Limited(2));

        assert!(tracker.admit_daily_quota_on("user-1", "2026-08-28"));
        tracker.record_daily_usage_on("user-1", "2026-08-28");
        assert!(tracker.admit_daily_quota_on("user-1", "2026-08-28"));
        tracker.record_daily_usage_on("user-1", "2026-08-28");
        assert!(!tracker.admit_daily_quota_on("user-1", "2026-08-28"));
    }

    #[test]
    fn new_day_resets_daily_quota() {
        let tracker = tracker(Limit::Unlimited, Limit::Limited(1));

        tracker.record_daily_usage_on("user-1", "2026-08-27");
        assert!(!tracker.admit_daily_quota_on("user-1", "2026-08-27"));
        assert!(tracker.admit_daily_quota_on("user-1", "2026-08-28"));
    }

    #[test]
    fn recording_sweeps_stale_day_buckets() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let tracker = QuotaTracker::new(
            store.clone(),
            RateLimitConfig {
                window: Duration::from_millis(60_000),
                max_requests: Limit::Unlimited,
            },
            Limit::Limited(10),
        );

        tracker.record_daily_usage_on("user-1", "2026-08-27");
        tracker.record_daily_usage_on("user-1", "2026-08-28");
        assert_eq!(store.daily_count("user-1", "2026-08-27").unwrap(), 0);
        assert_eq!(store.daily_count("user-1", "2026-08-28").unwrap(), 1);
    }

    #[test]
    fn daily_quota_tracks_users_separately() {
        let tracker = tracker(Limit::Unlimited, Limit::Limited(1));

        tracker.record_daily_usage_on("user-1", "2026-08-28");
        assert!(!tracker.admit_daily_quota_on("user-1", "2026-08-28"));
        assert!(tracker.admit_daily_quota_on("user-2", "2026-08-28"));
    }
}
