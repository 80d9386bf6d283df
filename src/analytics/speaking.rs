use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{ConversationEvent, Role};

/// Gap bounds in seconds. The floor models minimum utterance time, the
/// ceiling stops idle gaps from being counted as speech.
const MIN_GAP_SECS: i64 = 10;
const MAX_GAP_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMinutes {
    pub date: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyMinutes {
    pub week: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyMinutes {
    pub month: String,
    pub minutes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingTimeStats {
    pub total_minutes: u64,
    pub daily_breakdown: Vec<DailyMinutes>,
    pub weekly_breakdown: Vec<WeeklyMinutes>,
    pub monthly_breakdown: Vec<MonthlyMinutes>,
}

/// Estimate speaking time from message gaps. For each adjacent pair
/// where the later event is a user message, the gap (clamped to
/// [10, 300] seconds) counts as speech and is attributed to the later
/// event's calendar day. The first event has no predecessor and
/// contributes nothing.
///
/// Weekly and monthly breakdowns re-group the daily minutes, so their
/// sums always match the daily totals.
pub fn speaking_time(events: &[ConversationEvent]) -> SpeakingTimeStats {
    let mut total_seconds = 0i64;
    let mut daily_seconds: BTreeMap<NaiveDate, i64> = BTreeMap::new();

    for pair in events.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        if later.role != Role::User {
            continue;
        }

        let gap = (later.timestamp - earlier.timestamp).num_seconds();
        let valid_gap = gap.clamp(MIN_GAP_SECS, MAX_GAP_SECS);
        total_seconds += valid_gap;
        *daily_seconds.entry(later.timestamp.date_naive()).or_insert(0) += valid_gap;
    }

    let daily_breakdown: Vec<DailyMinutes> = daily_seconds
        .iter()
        .map(|(date, seconds)| DailyMinutes {
            date: date.to_string(),
            minutes: (*seconds / 60) as u64,
        })
        .collect();

    let mut weekly: BTreeMap<String, u64> = BTreeMap::new();
    let mut monthly: BTreeMap<String, u64> = BTreeMap::new();
    for (date, entry) in daily_seconds.keys().zip(&daily_breakdown) {
        *weekly.entry(week_start(*date).to_string()).or_insert(0) += entry.minutes;
        *monthly.entry(entry.date[..7].to_string()).or_insert(0) += entry.minutes;
    }

    SpeakingTimeStats {
        total_minutes: (total_seconds / 60) as u64,
        daily_breakdown,
        weekly_breakdown: weekly
            .into_iter()
            .map(|(week, minutes)| WeeklyMinutes { week, minutes })
            .collect(),
        monthly_breakdown: monthly
            .into_iter()
            .map(|(month, minutes)| MonthlyMinutes { month, minutes })
            .collect(),
    }
}

/// Monday of the ISO week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}
