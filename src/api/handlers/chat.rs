//! Chat session, message, and document ingestion handlers

use axum::extract::Path;
use axum::extract::State;
use axum::Json;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use crate::api::types::ApiResponse;
use crate::api::types::ChatResponse;
use crate::api::types::CreateSessionRequest;
use crate::api::types::DeleteSessionResponse;
use crate::api::types::IngestRequest;
use crate::api::types::IngestResponse;
use crate::api::types::MessageResponse;
use crate::api::types::SendMessageRequest;
use crate::api::types::SessionDetailResponse;
use crate::api::types::SessionResponse;
use crate::database::DEFAULT_HISTORY_LIMIT;
use crate::database::DEFAULT_SESSION_TTL_HOURS;
use crate::models::ChatRole;
use crate::models::ChatTurn;
use crate::RagChatError;

/// Create a titled chat session (POST /api/v1/chat/sessions)
pub async fn create_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateSessionRequest>,
) -> ApiResult<SessionResponse> {
    info!("POST /api/v1/chat/sessions - user {}", user.id);

    if req.title.trim().is_empty() {
        return Err(
            RagChatError::InvalidInput("Session title must not be empty".to_string()).into(),
        );
    }

    let session = state
        .database
        .create_session(user.id, &req.title, DEFAULT_SESSION_TTL_HOURS)
        .await?;

    Ok(Json(ApiResponse::success(SessionResponse::from(session))))
}

/// List the caller's sessions (GET /api/v1/chat/sessions)
pub async fn list_sessions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Vec<SessionResponse>> {
    let sessions = state.database.list_sessions(user.id).await?;

    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(SessionResponse::from).collect(),
    )))
}

/// Get one session with its messages (GET /api/v1/chat/sessions/:id)
///
/// Foreign and expired sessions both read as not found.
pub async fn get_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<Uuid>,
) -> ApiResult<SessionDetailResponse> {
    let session = state
        .database
        .get_active_session(session_id, user.id)
        .await?
        .ok_or(RagChatError::SessionNotFound(session_id))?;

    let messages = state
        .database
        .get_session_messages(session_id, DEFAULT_HISTORY_LIMIT)
        .await?;

    Ok(Json(ApiResponse::success(SessionDetailResponse {
        id: session.id,
        user_id: session.user_id,
        title: session.title,
        created_at: session.created_at,
        updated_at: session.updated_at,
        expires_at: session.expires_at,
        messages: messages.into_iter().map(MessageResponse::from).collect(),
    })))
}

/// Delete a session, its messages, and its documents
/// (DELETE /api/v1/chat/sessions/:id)
pub async fn delete_session(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<Uuid>,
) -> ApiResult<DeleteSessionResponse> {
    info!("DELETE /api/v1/chat/sessions/{}", session_id);

    let deleted = state.database.delete_session(session_id, user.id).await?;
    if deleted == 0 {
        return Err(RagChatError::SessionNotFound(session_id).into());
    }

    let deleted_documents = state.vector_store.delete_by_session(session_id).await?;

    Ok(Json(ApiResponse::success(DeleteSessionResponse {
        id: session_id,
        deleted_documents,
    })))
}

/// Send a message and get the grounded assistant reply
/// (POST /api/v1/chat/sessions/:id/messages)
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<ChatResponse> {
    info!("POST /api/v1/chat/sessions/{}/messages", session_id);

    if req.content.trim().is_empty() {
        return Err(
            RagChatError::InvalidInput("Message content must not be empty".to_string()).into(),
        );
    }

    state
        .database
        .get_active_session(session_id, user.id)
        .await?
        .ok_or(RagChatError::SessionNotFound(session_id))?;

    state
        .database
        .create_message(session_id, ChatRole::User, &req.content, None)
        .await?;
    state.database.touch_session(session_id).await?;

    let messages = state
        .database
        .get_session_messages(session_id, DEFAULT_HISTORY_LIMIT)
        .await?;
    let history: Vec<ChatTurn> = messages.iter().map(ChatTurn::from).collect();

    let message = state.pipeline.handle_message(session_id, history).await?;

    Ok(Json(ApiResponse::success(ChatResponse { message })))
}

/// Ingest documents into a session's retrieval index
/// (POST /api/v1/chat/sessions/:id/documents)
pub async fn ingest_documents(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(session_id): Path<Uuid>,
    Json(req): Json<IngestRequest>,
) -> ApiResult<IngestResponse> {
    info!(
        "POST /api/v1/chat/sessions/{}/documents - {} texts",
        session_id,
        req.texts.len()
    );

    if req.texts.is_empty() {
        return Err(RagChatError::InvalidInput("No texts to ingest".to_string()).into());
    }
    if req.texts.iter().any(|text| text.trim().is_empty()) {
        return Err(RagChatError::InvalidInput("Texts must not be empty".to_string()).into());
    }

    state
        .database
        .get_active_session(session_id, user.id)
        .await?
        .ok_or(RagChatError::SessionNotFound(session_id))?;

    let vectors = state.embeddings.embed(&req.texts).await?;
    let ids = state
        .vector_store
        .add(&req.texts, &vectors, Some(session_id), req.metadata.as_deref())
        .await?;

    info!("Ingested {} documents for session {}", ids.len(), session_id);
    Ok(Json(ApiResponse::success(IngestResponse { ids })))
}
