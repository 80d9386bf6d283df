use async_trait::async_trait;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::analytics::Role;

use super::{ConversationStorage, MessageRow};

pub struct SqliteConversationStorage {
    pool: SqlitePool,
}

impl SqliteConversationStorage {
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Initializing SQLite conversation storage at {}", database_url);
        let pool = SqlitePool::connect(database_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversation_records (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                session_id TEXT NOT NULL,
                character_name TEXT,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_records_user_created
             ON conversation_records (user_id, created_at)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn row_to_message(row: sqlx::sqlite::SqliteRow) -> Result<MessageRow> {
        let role: String = row.get("role");
        let role = match role.as_str() {
            "user" => Role::User,
            _ => Role::Assistant,
        };

        Ok(MessageRow {
            user_id: row.get("user_id"),
            session_id: row.get("session_id"),
            character_name: row.get("character_name"),
            role,
            content: row.get("content"),
            created_at: DateTime::parse_from_rfc3339(row.get("created_at"))?.with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl ConversationStorage for SqliteConversationStorage {
    async fn insert(&self, row: &MessageRow) -> Result<()> {
        let role = match row.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };

        sqlx::query(
            r#"
            INSERT INTO conversation_records
            (id, user_id, session_id, character_name, role, content, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&row.user_id)
        .bind(&row.session_id)
        .bind(&row.character_name)
        .bind(role)
        .bind(&row.content)
        .bind(row.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
        newest_first: bool,
    ) -> Result<Vec<MessageRow>> {
        // RFC3339 strings compare in timestamp order for a fixed offset.
        let order = if newest_first { "DESC" } else { "ASC" };
        let sql = format!(
            "SELECT * FROM conversation_records WHERE user_id = ?{} ORDER BY created_at {}",
            if since.is_some() { " AND created_at >= ?" } else { "" },
            order,
        );

        let mut query = sqlx::query(&sql).bind(user_id);
        if let Some(since) = since {
            query = query.bind(since.to_rfc3339());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_message).collect()
    }

    async fn list_session_messages(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<MessageRow>> {
        let rows = sqlx::query(
            "SELECT * FROM conversation_records
             WHERE user_id = ? AND session_id = ?
             ORDER BY created_at ASC",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_message).collect()
    }
}
