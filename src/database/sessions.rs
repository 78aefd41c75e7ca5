use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use super::Database;
use crate::models::ChatSession;
use crate::Result;

/// Sessions expire one hour after creation
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 1;

impl Database {
    /// Create a new titled chat session for a user
    pub async fn create_session(
        &self,
        user_id: Uuid,
        title: &str,
        ttl_hours: i64,
    ) -> Result<ChatSession> {
        let expires_at = Utc::now() + Duration::hours(ttl_hours);

        let session = sqlx::query_as(
            "INSERT INTO chat_sessions (id, user_id, title, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(title)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Bump a session's `updated_at` to now
    pub async fn touch_session(&self, session_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE chat_sessions SET updated_at = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Get a session owned by the user, if it exists and has not expired
    pub async fn get_active_session(
        &self,
        session_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ChatSession>> {
        let session = sqlx::query_as(
            "SELECT * FROM chat_sessions
             WHERE id = $1 AND user_id = $2 AND expires_at > NOW()",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// List all sessions for a user, newest first, expired ones included
    pub async fn list_sessions(&self, user_id: Uuid) -> Result<Vec<ChatSession>> {
        let sessions = sqlx::query_as(
            "SELECT * FROM chat_sessions
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Delete a session owned by the user, returning the number of rows removed
    ///
    /// Messages go with it via the foreign key cascade.
    pub async fn delete_session(&self, session_id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chat_sessions WHERE id = $1 AND user_id = $2")
            .bind(session_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
