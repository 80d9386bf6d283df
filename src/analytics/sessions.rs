use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ConversationEvent;

const RECENT_SESSION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub character_name: Option<String>,
    pub message_count: u64,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterUsage {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_sessions: u64,
    pub average_messages_per_session: u64,
    pub favorite_character: Option<CharacterUsage>,
    pub recent_sessions: Vec<SessionSummary>,
}

/// Aggregate per-session statistics. Session start time is the minimum
/// timestamp observed for that session, independent of input order.
/// The favorite character is the one with the strictly highest message
/// count; ties keep the first character encountered in the input.
pub fn session_stats(events: &[ConversationEvent]) -> SessionStats {
    if events.is_empty() {
        return SessionStats::default();
    }

    let mut sessions: HashMap<&str, SessionSummary> = HashMap::new();
    let mut character_counts: HashMap<&str, u64> = HashMap::new();
    let mut character_order: Vec<&str> = Vec::new();

    for event in events {
        sessions
            .entry(&event.session_id)
            .and_modify(|s| {
                s.message_count += 1;
                s.start_time = s.start_time.min(event.timestamp);
            })
            .or_insert_with(|| SessionSummary {
                session_id: event.session_id.clone(),
                character_name: event.character_name.clone(),
                message_count: 1,
                start_time: event.timestamp,
            });

        if let Some(name) = event.character_name.as_deref() {
            match character_counts.get_mut(name) {
                Some(count) => *count += 1,
                None => {
                    character_counts.insert(name, 1);
                    character_order.push(name);
                }
            }
        }
    }

    let total_sessions = sessions.len() as u64;
    let average_messages_per_session =
        (events.len() as f64 / total_sessions as f64).round() as u64;

    let mut favorite_character: Option<CharacterUsage> = None;
    for name in character_order {
        let count = character_counts[name];
        if favorite_character.as_ref().is_none_or(|f| count > f.count) {
            favorite_character = Some(CharacterUsage {
                name: name.to_string(),
                count,
            });
        }
    }

    let mut recent_sessions: Vec<SessionSummary> = sessions.into_values().collect();
    recent_sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    recent_sessions.truncate(RECENT_SESSION_LIMIT);

    SessionStats {
        total_sessions,
        average_messages_per_session,
        favorite_character,
        recent_sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Role;
    use chrono::TimeZone;

    fn event(
        session: &str,
        character: Option<&str>,
        minute: u32,
    ) -> ConversationEvent {
        ConversationEvent {
            timestamp: Utc.with_ymd_and_hms(2026, 8, 28, 10, minute, 0).unwrap(),
            role: Role::User,
            session_id: session.to_string(),
            character_name: character.map(str::to_string),
        }
    }

    #[test]
    fn empty_input_yields_defaults() {
        let stats = session_stats(&[]);
        assert_eq!(stats.total_sessions, 0);
        assert_eq!(stats.average_messages_per_session, 0);
        assert!(stats.favorite_character.is_none());
        assert!(stats.recent_sessions.is_empty());
    }

    #[test]
    fn two_sessions_with_three_and_five_messages() {
        let mut events = Vec::new();
        for i in 0..3 {
            events.push(event("s1", Some("Ash"), i));
        }
        for i in 10..15 {
            events.push(event("s2", Some("Jane"), i));
        }

        let stats = session_stats(&events);
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.average_messages_per_session, 4); // round(8 / 2)
        assert_eq!(stats.favorite_character.unwrap().name, "Jane");
    }

    #[test]
    fn start_time_is_minimum_timestamp_regardless_of_order() {
        // Newest-first input, as storage returns it for this query.
        let events = vec![
            event("s1", Some("Ash"), 30),
            event("s1", Some("Ash"), 15),
            event("s1", Some("Ash"), 5),
        ];
        let stats = session_stats(&events);
        assert_eq!(
            stats.recent_sessions[0].start_time,
            Utc.with_ymd_and_hms(2026, 8, 28, 10, 5, 0).unwrap()
        );
    }

    #[test]
    fn favorite_character_tie_keeps_first_encountered() {
        let events = vec![
            event("s1", Some("Ash"), 0),
            event("s2", Some("Jane"), 1),
            event("s3", Some("Jane"), 2),
            event("s4", Some("Ash"), 3),
        ];
        let stats = session_stats(&events);
        let favorite = stats.favorite_character.unwrap();
        assert_eq!(favorite.name, "Ash");
        assert_eq!(favorite.count, 2);
    }

    #[test]
    fn events_without_character_produce_no_favorite() {
        let events = vec![event("s1", None, 0), event("s1", None, 1)];
        let stats = session_stats(&events);
        assert!(stats.favorite_character.is_none());
    }

    #[test]
    fn recent_sessions_capped_at_ten_and_sorted_descending() {
        let mut events = Vec::new();
        for i in 0..12u32 {
            events.push(event(&format!("s{}", i), Some("Ash"), i));
        }
        let stats = session_stats(&events);
        assert_eq!(stats.total_sessions, 12);
        assert_eq!(stats.recent_sessions.len(), 10);
        for pair in stats.recent_sessions.windows(2) {
            assert!(pair[0].start_time >= pair[1].start_time);
        }
        assert_eq!(stats.recent_sessions[0].session_id, "s11");
    }
}
