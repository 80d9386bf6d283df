use chrono::{Duration, TimeZone, Utc};
use tempfile::NamedTempFile;

use super::sqlite::SqliteConversationStorage;
use super::{ConversationStorage, MessageRow};
use crate::analytics::Role;

async fn setup_storage() -> SqliteConversationStorage {
    SqliteConversationStorage::new("sqlite::memory:").await.unwrap()
}

fn row(user: &str, session: &str, minute_offset: i64, role: Role) -> MessageRow {
    MessageRow {
        user_id: user.to_string(),
        session_id: session.to_string(),
        character_name: Some("Ash".to_string()),
        role,
        content: format!("message at +{}m", minute_offset),
        created_at: Utc.with_ymd_and_hms(2026, 8, 28, 9, 0, 0).unwrap()
            + Duration::minutes(minute_offset),
    }
}

#[tokio::test]
async fn file_backed_database_persists_across_connections() {
    let temp_file = NamedTempFile::new().unwrap();
    let url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let storage = SqliteConversationStorage::new(&url).await.unwrap();
    storage.insert(&row("u1", "s1", 0, Role::User)).await.unwrap();
    drop(storage);

    let reopened = SqliteConversationStorage::new(&url).await.unwrap();
    let rows = reopened.list_for_user("u1", None, false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content, "message at +0m");
}

#[tokio::test]
async fn insert_and_list_preserves_fields() {
    let storage = setup_storage().await;
    storage.insert(&row("u1", "s1", 0, Role::User)).await.unwrap();

    let rows = storage.list_for_user("u1", None, false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].session_id, "s1");
    assert_eq!(rows[0].role, Role::User);
    assert_eq!(rows[0].character_name.as_deref(), Some("Ash"));
}

#[tokio::test]
async fn list_for_user_orders_both_directions() {
    let storage = setup_storage().await;
    for offset in [5, 0, 10] {
        storage.insert(&row("u1", "s1", offset, Role::User)).await.unwrap();
    }

    let ascending = storage.list_for_user("u1", None, false).await.unwrap();
    assert!(ascending.windows(2).all(|p| p[0].created_at <= p[1].created_at));

    let descending = storage.list_for_user("u1", None, true).await.unwrap();
    assert!(descending.windows(2).all(|p| p[0].created_at >= p[1].created_at));
}

#[tokio::test]
async fn since_filter_drops_older_rows() {
    let storage = setup_storage().await;
    storage.insert(&row("u1", "s1", 0, Role::User)).await.unwrap();
    storage.insert(&row("u1", "s1", 60, Role::User)).await.unwrap();

    let since = Utc.with_ymd_and_hms(2026, 8, 28, 9, 30, 0).unwrap();
    let rows = storage.list_for_user("u1", Some(since), false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].created_at >= since);
}

#[tokio::test]
async fn users_do_not_see_each_other() {
    let storage = setup_storage().await;
    storage.insert(&row("u1", "s1", 0, Role::User)).await.unwrap();
    storage.insert(&row("u2", "s2", 0, Role::User)).await.unwrap();

    let rows = storage.list_for_user("u1", None, false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, "u1");
}

#[tokio::test]
async fn session_messages_are_scoped_and_ascending() {
    let storage = setup_storage().await;
    storage.insert(&row("u1", "s1", 5, Role::Assistant)).await.unwrap();
    storage.insert(&row("u1", "s1", 0, Role::User)).await.unwrap();
    storage.insert(&row("u1", "s2", 1, Role::User)).await.unwrap();

    let rows = storage.list_session_messages("u1", "s1").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].role, Role::User);
    assert_eq!(rows[1].role, Role::Assistant);
}
