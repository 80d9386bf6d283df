use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

pub mod sessions;
pub mod speaking;
pub mod streaks;

pub use sessions::{session_stats, SessionStats, SessionSummary};
pub use speaking::{speaking_time, SpeakingTimeStats};
pub use streaks::{streaks, StreakStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One stored conversation message, as read back from storage in
/// timestamp order. Analytics only reads these, never mutates.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    pub timestamp: DateTime<Utc>,
    pub role: Role,
    pub session_id: String,
    pub character_name: Option<String>,
}

/// Reporting window for the speaking-time estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    All,
}

impl Period {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            "all" => Some(Period::All),
            _ => None,
        }
    }

    /// Earliest timestamp included in this period, relative to `now`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Daily => Some(now - chrono::Duration::days(30)),
            Period::Weekly => Some(now - chrono::Duration::days(90)),
            Period::Monthly => now.checked_sub_months(Months::new(12)),
            Period::All => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_periods() {
        assert_eq!(Period::parse("daily"), Some(Period::Daily));
        assert_eq!(Period::parse("weekly"), Some(Period::Weekly));
        assert_eq!(Period::parse("monthly"), Some(Period::Monthly));
        assert_eq!(Period::parse("all"), Some(Period::All));
        assert_eq!(Period::parse("yearly"), None);
    }

    #[test]
    fn all_period_has_no_cutoff() {
        assert!(Period::All.cutoff(Utc::now()).is_none());
        assert!(Period::Daily.cutoff(Utc::now()).is_some());
    }
}
