use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ConversationEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub practice_dates: Vec<String>,
}

/// Practice streaks over the unique calendar dates of the events. Any
/// message counts as practice on its day, regardless of role.
pub fn streaks(events: &[ConversationEvent]) -> StreakStats {
    streaks_on(events, Utc::now().date_naive())
}

/// Current streak is nonzero only when the latest practice date is
/// `today` or yesterday; it then extends backwards while consecutive
/// dates are exactly one day apart.
pub(crate) fn streaks_on(events: &[ConversationEvent], today: NaiveDate) -> StreakStats {
    let dates: Vec<NaiveDate> = events
        .iter()
        .map(|e| e.timestamp.date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let Some(last) = dates.last().copied() else {
        return StreakStats::default();
    };

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
    }
    longest = longest.max(run);

    let yesterday = today - chrono::Duration::days(1);
    let mut current = 0u32;
    if last == today || last == yesterday {
        current = 1;
        for pair in dates.windows(2).rev() {
            if (pair[1] - pair[0]).num_days() == 1 {
                current += 1;
            } else {
                break;
            }
        }
    }

    StreakStats {
        current_streak: current,
        longest_streak: longest,
        practice_dates: dates.iter().map(|d| d.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Role;
    use chrono::{TimeZone, Utc};

    fn event_on(date: NaiveDate) -> ConversationEvent {
        ConversationEvent {
            timestamp: Utc
                .with_ymd_and_hms(2026, 1, 1, 10, 30, 0)
                .unwrap()
                .with_timezone(&Utc)
                + (date - NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            role: Role::User,
            session_id: "s1".to_string(),
            character_name: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let stats = streaks_on(&[], day(28));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert!(stats.practice_dates.is_empty());
    }

    #[test]
    fn three_consecutive_days_give_longest_three() {
        let events: Vec<_> = [26, 27, 28].map(day).map(event_on).to_vec();
        let stats = streaks_on(&events, day(28));
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn single_practice_day_gives_longest_one() {
        let stats = streaks_on(&[event_on(day(10))], day(28));
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn stale_latest_date_zeroes_current_streak() {
        let events: Vec<_> = [20, 21, 22].map(day).map(event_on).to_vec();
        let stats = streaks_on(&events, day(28));
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 0);
    }

    #[test]
    fn yesterday_still_counts_for_current_streak() {
        let events: Vec<_> = [25, 26, 27].map(day).map(event_on).to_vec();
        let stats = streaks_on(&events, day(28));
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn current_streak_stops_at_first_gap() {
        let events: Vec<_> = [20, 21, 24, 27, 28].map(day).map(event_on).to_vec();
        let stats = streaks_on(&events, day(28));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn duplicate_timestamps_on_one_day_count_once() {
        let events = vec![event_on(day(28)), event_on(day(28)), event_on(day(28))];
        let stats = streaks_on(&events, day(28));
        assert_eq!(stats.practice_dates, vec!["2026-08-28".to_string()]);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn practice_dates_are_sorted_ascending() {
        let events: Vec<_> = [28, 20, 24].map(day).map(event_on).to_vec();
        let stats = streaks_on(&events, day(28));
        assert_eq!(
            stats.practice_dates,
            vec!["2026-08-20", "2026-08-24", "2026-08-28"]
        );
    }
}
