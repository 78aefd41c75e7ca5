//! API request handlers

use std::sync::Arc;

use axum::Json;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::auth::TokenService;
use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::rag::ChatPipeline;
use crate::vector_store::VectorStore;

pub mod auth;
pub mod chat;

pub use auth::*;
pub use chat::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub pipeline: Arc<ChatPipeline>,
    pub embeddings: Arc<EmbeddingClient>,
    pub vector_store: Arc<VectorStore>,
    pub tokens: Arc<TokenService>,
}

/// Health check handler
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
