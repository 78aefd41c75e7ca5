//! Grounded answer generation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::llm::ChatMessage;
use crate::llm::LlmClient;
use crate::models::ChatTurn;
use crate::rag::prompts;
use crate::rag::GenerateResponse;
use crate::Result;

/// Generates the assistant reply from history and retrieved context
pub struct ResponseGenerator {
    llm: Arc<LlmClient>,
}

impl ResponseGenerator {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl GenerateResponse for ResponseGenerator {
    /// Send the grounding system prompt plus the full conversation
    async fn generate(&self, history: &[ChatTurn], context: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(ChatMessage::system(prompts::build_system_prompt(context)));
        messages.extend(history.iter().map(ChatMessage::from));

        debug!("Generating completion from {} messages", messages.len());
        self.llm.chat(&messages).await
    }
}
