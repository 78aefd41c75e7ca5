//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers;
use super::handlers::AppState;

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Auth endpoints
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/users/me", get(handlers::me))
        // Chat endpoints
        .route(
            "/chat/sessions",
            post(handlers::create_session).get(handlers::list_sessions),
        )
        .route(
            "/chat/sessions/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/chat/sessions/:session_id/messages",
            post(handlers::send_message),
        )
        // Document ingestion
        .route(
            "/chat/sessions/:session_id/documents",
            post(handlers::ingest_documents),
        )
        .with_state(state)
}
