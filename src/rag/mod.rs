//! RAG (Retrieval-Augmented Generation) chat module
//!
//! End-to-end pipeline for answering a chat message:
//! - Semantic retrieval of session-scoped context via vector embeddings
//! - Grounded answer generation with an LLM
//! - Durable persistence of the assistant reply
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ragchat::config::AppConfig;
//! use ragchat::database::Database;
//! use ragchat::embeddings::EmbeddingClient;
//! use ragchat::llm::LlmClient;
//! use ragchat::models::ChatTurn;
//! use ragchat::rag::ChatPipeline;
//! use ragchat::rag::ContextRetriever;
//! use ragchat::rag::ResponseGenerator;
//! use ragchat::vector_store::VectorStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let database = Arc::new(Database::from_config(&config).await?);
//!     let embeddings = Arc::new(EmbeddingClient::new(&config.embeddings)?);
//!     let vector_store = Arc::new(VectorStore::new(
//!         database.pool().clone(),
//!         config.collection_name(),
//!         config.embedding_dimension(),
//!     )?);
//!     let llm = Arc::new(LlmClient::new(&config.llm)?);
//!
//!     let pipeline = ChatPipeline::new(
//!         Arc::new(ContextRetriever::new(embeddings, vector_store, config.top_k())),
//!         Arc::new(ResponseGenerator::new(llm)),
//!         database,
//!     );
//!
//!     let session_id = uuid::Uuid::new_v4();
//!     let history = vec![ChatTurn::user("What is the capital of France?")];
//!     let answer = pipeline.handle_message(session_id, history).await?;
//!     println!("Answer: {answer}");
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use uuid::Uuid;

pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod retriever;

pub use generator::ResponseGenerator;
pub use pipeline::ChatPipeline;
pub use pipeline::ChatState;
pub use retriever::ContextRetriever;

use crate::models::ChatTurn;
use crate::models::Message;
use crate::Result;

/// Produces grounding context for a conversation
#[async_trait]
pub trait RetrieveContext: Send + Sync {
    /// Retrieve context text relevant to the latest turn, scoped to the session
    async fn retrieve(&self, history: &[ChatTurn], session_id: Uuid) -> Result<String>;
}

/// Produces the assistant reply from history plus retrieved context
#[async_trait]
pub trait GenerateResponse: Send + Sync {
    async fn generate(&self, history: &[ChatTurn], context: &str) -> Result<String>;
}

/// Durable message storage as seen by the pipeline
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Record the assistant reply against its session
    async fn save_assistant_message(
        &self,
        session_id: Uuid,
        content: &str,
        context: Option<&str>,
    ) -> Result<Message>;

    /// Load a session's turns in chronological order, up to `limit`
    async fn load_history(&self, session_id: Uuid, limit: i64) -> Result<Vec<ChatTurn>>;
}
