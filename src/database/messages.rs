use async_trait::async_trait;
use uuid::Uuid;

use super::Database;
use crate::models::ChatRole;
use crate::models::ChatTurn;
use crate::models::Message;
use crate::rag::MessageStore;
use crate::Result;

/// History sent to the language model is capped at the oldest 50 messages
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

impl Database {
    /// Append a message to a session
    pub async fn create_message(
        &self,
        session_id: Uuid,
        role: ChatRole,
        content: &str,
        context_chunks: Option<&str>,
    ) -> Result<Message> {
        let message = sqlx::query_as(
            "INSERT INTO messages (id, session_id, role, content, context_chunks)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(role.as_str())
        .bind(content)
        .bind(context_chunks)
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Get a session's messages in chronological order, up to `limit`
    pub async fn get_session_messages(
        &self,
        session_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>> {
        let messages = sqlx::query_as(
            "SELECT * FROM messages
             WHERE session_id = $1
             ORDER BY created_at ASC
             LIMIT $2",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}

#[async_trait]
impl MessageStore for Database {
    async fn save_assistant_message(
        &self,
        session_id: Uuid,
        content: &str,
        context: Option<&str>,
    ) -> Result<Message> {
        self.create_message(session_id, ChatRole::Assistant, content, context)
            .await
    }

    async fn load_history(&self, session_id: Uuid, limit: i64) -> Result<Vec<ChatTurn>> {
        let messages = self.get_session_messages(session_id, limit).await?;
        Ok(messages.iter().map(ChatTurn::from).collect())
    }
}
