//! Chat pipeline: retrieve -> generate -> persist

use std::sync::Arc;

use tracing::debug;
use tracing::info;
use uuid::Uuid;

use crate::errors::PipelineStage;
use crate::models::ChatTurn;
use crate::rag::GenerateResponse;
use crate::rag::MessageStore;
use crate::rag::RetrieveContext;
use crate::RagChatError;
use crate::Result;

/// Execution state threaded through the pipeline stages by ownership
///
/// One record per inbound message. `context` is filled by the retrieve
/// stage; `response` is set exactly once, by the generate stage.
#[derive(Debug)]
pub struct ChatState {
    pub session_id: Uuid,
    pub history: Vec<ChatTurn>,
    pub context: String,
    pub response: Option<String>,
}

impl ChatState {
    #[must_use]
    pub fn new(session_id: Uuid, history: Vec<ChatTurn>) -> Self {
        Self {
            session_id,
            history,
            context: String::new(),
            response: None,
        }
    }
}

/// Orchestrates the three pipeline stages for one inbound message
///
/// Stages run strictly in sequence; each failure is tagged with the stage
/// it came from. Concurrent messages run as independent pipeline instances
/// with independent state, and no write ordering is imposed between them;
/// stored messages order by creation time.
pub struct ChatPipeline {
    retriever: Arc<dyn RetrieveContext>,
    generator: Arc<dyn GenerateResponse>,
    store: Arc<dyn MessageStore>,
}

impl ChatPipeline {
    pub fn new(
        retriever: Arc<dyn RetrieveContext>,
        generator: Arc<dyn GenerateResponse>,
        store: Arc<dyn MessageStore>,
    ) -> Self {
        Self {
            retriever,
            generator,
            store,
        }
    }

    /// Answer one inbound user message
    ///
    /// Retrieves session context, generates a grounded reply, and persists
    /// it. A persistence failure fails the whole call even though the model
    /// already produced a reply; nothing is returned that was not stored.
    ///
    /// # Errors
    /// - Context retrieval errors (embedding generation, index queries)
    /// - LLM generation errors (API failures, rate limits, empty completions)
    /// - Persistence errors (unknown session, storage failures)
    pub async fn handle_message(&self, session_id: Uuid, history: Vec<ChatTurn>) -> Result<String> {
        info!("Processing chat message for session {}", session_id);

        let state = ChatState::new(session_id, history);

        let state = self
            .retrieve_stage(state)
            .await
            .map_err(|e| RagChatError::in_stage(PipelineStage::Retrieve, e))?;

        let state = self
            .generate_stage(state)
            .await
            .map_err(|e| RagChatError::in_stage(PipelineStage::Generate, e))?;

        let response = self
            .persist_stage(state)
            .await
            .map_err(|e| RagChatError::in_stage(PipelineStage::Persist, e))?;

        info!("Chat pipeline completed for session {}", session_id);
        Ok(response)
    }

    async fn retrieve_stage(&self, mut state: ChatState) -> Result<ChatState> {
        debug!("Stage 1: Retrieving context");
        state.context = self
            .retriever
            .retrieve(&state.history, state.session_id)
            .await?;

        debug!("Retrieved {} context chars", state.context.len());
        Ok(state)
    }

    async fn generate_stage(&self, mut state: ChatState) -> Result<ChatState> {
        debug!("Stage 2: Generating response");
        let response = self
            .generator
            .generate(&state.history, &state.context)
            .await?;

        state.response = Some(response);
        Ok(state)
    }

    /// Consumes the state; the returned text is exactly what was stored
    async fn persist_stage(&self, state: ChatState) -> Result<String> {
        debug!("Stage 3: Persisting response");
        let response = state
            .response
            .ok_or_else(|| RagChatError::Generation("No response to persist".to_string()))?;

        let context = (!state.context.is_empty()).then_some(state.context.as_str());
        self.store
            .save_assistant_message(state.session_id, &response, context)
            .await?;

        Ok(response)
    }
}
