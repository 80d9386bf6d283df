use async_trait::async_trait;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::Role;

pub mod sqlite;

/// One stored message. Rows are append-only; nothing ever updates or
/// deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRow {
    pub user_id: String,
    pub session_id: String,
    pub character_name: Option<String>,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ConversationStorage: Send + Sync + 'static {
    async fn insert(&self, row: &MessageRow) -> Result<()>;

    /// All rows for a user ordered by `created_at`, optionally bounded
    /// below by `since`. `newest_first` flips the sort direction.
    async fn list_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
        newest_first: bool,
    ) -> Result<Vec<MessageRow>>;

    /// Messages of one session, oldest first.
    async fn list_session_messages(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<MessageRow>>;
}

#[cfg(test)]
mod tests;
