//! Session-scoped context retrieval

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::embeddings::EmbeddingClient;
use crate::models::ChatTurn;
use crate::rag::RetrieveContext;
use crate::vector_store::VectorStore;
use crate::RagChatError;
use crate::Result;

/// Separator between concatenated context snippets
const SNIPPET_SEPARATOR: &str = "\n\n";

/// Retrieves grounding snippets for the latest conversation turn
pub struct ContextRetriever {
    embeddings: Arc<EmbeddingClient>,
    vector_store: Arc<VectorStore>,
    top_k: i64,
}

impl ContextRetriever {
    /// Create a new retriever requesting `top_k` snippets per query
    pub fn new(
        embeddings: Arc<EmbeddingClient>,
        vector_store: Arc<VectorStore>,
        top_k: usize,
    ) -> Self {
        Self {
            embeddings,
            vector_store,
            top_k: top_k as i64,
        }
    }
}

#[async_trait]
impl RetrieveContext for ContextRetriever {
    /// Embed the latest turn and search the session's snippets
    ///
    /// An empty conversation yields empty context without touching the
    /// embedding provider or the index.
    async fn retrieve(&self, history: &[ChatTurn], session_id: Uuid) -> Result<String> {
        let query = latest_query(history);
        if query.is_empty() {
            debug!("Empty query for session {}, skipping retrieval", session_id);
            return Ok(String::new());
        }

        debug!("Retrieving context for session {}: {}", session_id, query);

        let embeddings = self.embeddings.embed(&[query.to_string()]).await?;
        let query_vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagChatError::Embedding("No embedding for query".to_string()))?;

        let matches = self
            .vector_store
            .search(&query_vector, Some(session_id), self.top_k)
            .await?;

        debug!("Retrieved {} snippets", matches.len());

        Ok(join_snippets(matches.iter().map(|m| m.text.as_str())))
    }
}

/// The most recent turn's content is the retrieval query
fn latest_query(history: &[ChatTurn]) -> &str {
    history.last().map_or("", |turn| turn.content.as_str())
}

/// Concatenate snippets in their given order, blank-line separated
fn join_snippets<'a>(snippets: impl Iterator<Item = &'a str>) -> String {
    snippets.collect::<Vec<_>>().join(SNIPPET_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_query_takes_last_turn() {
        let history = vec![
            ChatTurn::user("first question"),
            ChatTurn::assistant("first answer"),
            ChatTurn::user("second question"),
        ];

        assert_eq!(latest_query(&history), "second question");
    }

    #[test]
    fn test_latest_query_empty_history() {
        assert_eq!(latest_query(&[]), "");
    }

    #[test]
    fn test_join_snippets_preserves_order() {
        let snippets = vec!["most similar", "second", "third"];
        let joined = join_snippets(snippets.into_iter());

        assert_eq!(joined, "most similar\n\nsecond\n\nthird");
    }

    #[test]
    fn test_join_snippets_empty() {
        assert_eq!(join_snippets(std::iter::empty()), "");
    }

    #[test]
    fn test_join_single_snippet_has_no_separator() {
        assert_eq!(join_snippets(std::iter::once("only")), "only");
    }
}
