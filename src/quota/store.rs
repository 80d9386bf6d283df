use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// One fixed counting window for a client key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub window_start: DateTime<Utc>,
    pub count: u32,
}

/// Counter storage behind the quota tracker. Both operations are atomic
/// check-and-increments so an admit decision can never interleave with
/// its own bookkeeping. The in-memory backend below serves a single
/// process; a shared backend would slot in here for multi-instance
/// deployments.
pub trait QuotaStore: Send + Sync + 'static {
    /// Run the fixed-window algorithm for `key`: reset the window if it
    /// has aged out, otherwise increment while below `max_requests`.
    /// Returns true when the request is admitted.
    fn take_window_slot(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_requests: u32,
    ) -> Result<bool, String>;

    /// Usage recorded so far for `user_id` on the given day.
    fn daily_count(&self, user_id: &str, day: &str) -> Result<u64, String>;

    /// Increment `user_id`'s counter for `day` and drop every other
    /// day's bucket. Returns the new count.
    fn record_daily(&self, user_id: &str, day: &str) -> Result<u64, String>;
}

/// Process-local backend. Rate windows are never evicted (one entry per
/// client key for the process lifetime); daily usage is bucketed by day
/// so the sweep in `record_daily` drops whole stale buckets instead of
/// scanning every user key.
pub struct InMemoryQuotaStore {
    windows: RwLock<HashMap<String, RateWindow>>,
    daily: RwLock<HashMap<String, HashMap<String, u64>>>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            daily: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryQuotaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotaStore for InMemoryQuotaStore {
    fn take_window_slot(
        &self,
        key: &str,
        now: DateTime<Utc>,
        window: Duration,
        max_requests: u32,
    ) -> Result<bool, String> {
        let window_ms = window.as_millis() as i64;
        let mut windows = self.windows.write().map_err(|e| e.to_string())?;

        match windows.get_mut(key) {
            Some(entry)
                if (now - entry.window_start).num_milliseconds() < window_ms =>
            {
                if entry.count < max_requests {
                    entry.count += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            _ => {
                windows.insert(
                    key.to_string(),
                    RateWindow {
                        window_start: now,
                        count: 1,
                    },
                );
                Ok(true)
            }
        }
    }

    fn daily_count(&self, user_id: &str, day: &str) -> Result<u64, String> {
        let daily = self.daily.read().map_err(|e| e.to_string())?;
        Ok(daily
            .get(day)
            .and_then(|bucket| bucket.get(user_id))
            .copied()
            .unwrap_or(0))
    }

    fn record_daily(&self, user_id: &str, day: &str) -> Result<u64, String> {
        let mut daily = self.daily.write().map_err(|e| e.to_string())?;
        daily.retain(|bucket_day, _| bucket_day == day);

        let counter = daily
            .entry(day.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}
