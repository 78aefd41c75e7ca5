//! HTTP server implementation

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers;
use crate::api::handlers::AppState;
use crate::api::routes;
use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingClient;
use crate::llm::LlmClient;
use crate::rag::ChatPipeline;
use crate::rag::ContextRetriever;
use crate::rag::ResponseGenerator;
use crate::vector_store::VectorStore;
use crate::Result;

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting RAG chat API server...");

    // Initialize services
    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;

    let vector_store = Arc::new(VectorStore::new(
        database.pool().clone(),
        config.collection_name(),
        config.embedding_dimension(),
    )?);
    vector_store.ensure_collection().await?;

    let embeddings = Arc::new(EmbeddingClient::new(&config.embeddings)?);
    let llm = Arc::new(LlmClient::new(&config.llm)?);
    let tokens = Arc::new(TokenService::new(
        config.jwt_secret(),
        config.token_expiry_minutes(),
    ));

    let retriever = Arc::new(ContextRetriever::new(
        embeddings.clone(),
        vector_store.clone(),
        config.top_k(),
    ));
    let generator = Arc::new(ResponseGenerator::new(llm));
    let pipeline = Arc::new(ChatPipeline::new(retriever, generator, database.clone()));

    let state = AppState {
        database,
        pipeline,
        embeddings,
        vector_store,
        tokens,
    };

    // Build routes
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", routes::api_routes(state));

    // Add middleware layers
    app = app
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    // Add CORS if enabled
    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    // Start server
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("");
    info!("Available endpoints:");
    info!("  GET    /health                             - Health check");
    info!("  POST   /api/v1/auth/register               - Register user");
    info!("  POST   /api/v1/auth/login                  - Login, get access token");
    info!("  GET    /api/v1/users/me                    - Current user");
    info!("  POST   /api/v1/chat/sessions               - Create chat session");
    info!("  GET    /api/v1/chat/sessions               - List chat sessions");
    info!("  GET    /api/v1/chat/sessions/:id           - Session with messages");
    info!("  DELETE /api/v1/chat/sessions/:id           - Delete session and documents");
    info!("  POST   /api/v1/chat/sessions/:id/messages  - Send message, get reply");
    info!("  POST   /api/v1/chat/sessions/:id/documents - Ingest documents");

    axum::serve(listener, app).await?;

    Ok(())
}
