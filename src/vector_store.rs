//! pgvector-backed snippet storage and nearest-neighbor search
//!
//! Records carry an optional session id that scopes later search and
//! deletion. Similarity is cosine, reported as `1 - distance` so higher
//! scores mean closer matches.

use pgvector::Vector;
use serde::Deserialize;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::RagChatError;
use crate::Result;

/// A single nearest-neighbor search hit
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SnippetMatch {
    pub id: Uuid,
    pub text: String,
    pub score: f64,
    pub metadata: Option<serde_json::Value>,
}

/// Vector store over one collection table
#[derive(Debug, Clone)]
pub struct VectorStore {
    pool: PgPool,
    collection: String,
    dimension: usize,
}

impl VectorStore {
    /// Create a store over the named collection
    ///
    /// Collection names are interpolated into SQL identifiers; only
    /// `[a-z0-9_]` names not starting with a digit are accepted.
    pub fn new(pool: PgPool, collection: &str, dimension: usize) -> Result<Self> {
        if !is_valid_collection_name(collection) {
            return Err(RagChatError::InvalidInput(format!(
                "Invalid collection name: '{collection}'"
            )));
        }

        Ok(Self {
            pool,
            collection: collection.to_string(),
            dimension,
        })
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Create the collection table and its session index if absent
    ///
    /// Safe to call repeatedly.
    pub async fn ensure_collection(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                session_id UUID,
                content TEXT NOT NULL,
                metadata JSONB,
                embedding vector({}) NOT NULL,
                created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
            )
            ",
            self.collection, self.dimension
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_session ON {}(session_id)",
            self.collection, self.collection
        ))
        .execute(&self.pool)
        .await?;

        tracing::debug!("Vector collection '{}' ensured", self.collection);
        Ok(())
    }

    /// Insert snippet records, returning their generated ids
    ///
    /// `session_id`, when given, becomes the scoping key for later search
    /// and deletion. Inputs are validated before anything is written; the
    /// insert itself runs in one transaction.
    pub async fn add(
        &self,
        texts: &[String],
        vectors: &[Vec<f32>],
        session_id: Option<Uuid>,
        metadata: Option<&[serde_json::Value]>,
    ) -> Result<Vec<Uuid>> {
        if texts.len() != vectors.len() {
            return Err(RagChatError::InvalidInput(format!(
                "Got {} texts but {} vectors",
                texts.len(),
                vectors.len()
            )));
        }
        if let Some(metadata) = metadata {
            if metadata.len() != texts.len() {
                return Err(RagChatError::InvalidInput(format!(
                    "Got {} texts but {} metadata entries",
                    texts.len(),
                    metadata.len()
                )));
            }
        }
        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(RagChatError::InvalidInput(format!(
                    "Vector has dimension {}, collection expects {}",
                    vector.len(),
                    self.dimension
                )));
            }
        }

        let insert = format!(
            "INSERT INTO {} (id, session_id, content, metadata, embedding)
             VALUES ($1, $2, $3, $4, $5)",
            self.collection
        );

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(texts.len());

        for (i, (text, vector)) in texts.iter().zip(vectors.iter()).enumerate() {
            let id = Uuid::new_v4();

            sqlx::query(&insert)
                .bind(id)
                .bind(session_id)
                .bind(text)
                .bind(metadata.map(|m| &m[i]))
                .bind(Vector::from(vector.clone()))
                .execute(&mut *tx)
                .await?;

            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    /// Nearest-neighbor search, most similar first
    ///
    /// Filters to `session_id` when given; an empty result set is valid.
    pub async fn search(
        &self,
        query_vector: &[f32],
        session_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<SnippetMatch>> {
        if query_vector.len() != self.dimension {
            return Err(RagChatError::InvalidInput(format!(
                "Query vector has dimension {}, collection expects {}",
                query_vector.len(),
                self.dimension
            )));
        }

        let query_vector = Vector::from(query_vector.to_vec());

        let matches = if let Some(session_id) = session_id {
            sqlx::query_as(&format!(
                "SELECT id, content AS text, 1 - (embedding <=> $1) AS score, metadata
                 FROM {}
                 WHERE session_id = $2
                 ORDER BY score DESC
                 LIMIT $3",
                self.collection
            ))
            .bind(query_vector)
            .bind(session_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(&format!(
                "SELECT id, content AS text, 1 - (embedding <=> $1) AS score, metadata
                 FROM {}
                 ORDER BY score DESC
                 LIMIT $2",
                self.collection
            ))
            .bind(query_vector)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(matches)
    }

    /// Remove every record belonging to the session
    ///
    /// Deleting an empty or unknown session is a no-op success.
    pub async fn delete_by_session(&self, session_id: Uuid) -> Result<u64> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE session_id = $1",
            self.collection
        ))
        .bind(session_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_validation() {
        assert!(is_valid_collection_name("documents"));
        assert!(is_valid_collection_name("documents_v2"));
        assert!(is_valid_collection_name("_scratch"));

        assert!(!is_valid_collection_name(""));
        assert!(!is_valid_collection_name("2fast"));
        assert!(!is_valid_collection_name("Documents"));
        assert!(!is_valid_collection_name("docs-prod"));
        assert!(!is_valid_collection_name("docs; DROP TABLE users"));
    }
}
