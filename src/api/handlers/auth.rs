//! Registration, login, and current-user handlers

use axum::extract::State;
use axum::Json;
use tracing::info;

use super::AppState;
use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use crate::api::types::ApiResponse;
use crate::api::types::LoginRequest;
use crate::api::types::RegisterRequest;
use crate::api::types::TokenResponse;
use crate::api::types::UserResponse;
use crate::auth;
use crate::RagChatError;

/// Register a new user (POST /api/v1/auth/register)
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<UserResponse> {
    info!("POST /api/v1/auth/register - {}", req.username);

    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(RagChatError::InvalidInput(
            "Username and password must not be empty".to_string(),
        )
        .into());
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(RagChatError::InvalidInput("Invalid email address".to_string()).into());
    }

    if state
        .database
        .get_user_by_username(&req.username)
        .await?
        .is_some()
    {
        return Err(RagChatError::UsernameTaken(req.username).into());
    }
    if state.database.get_user_by_email(&req.email).await?.is_some() {
        return Err(RagChatError::EmailTaken(req.email).into());
    }

    let hashed = auth::hash_password(&req.password)?;
    let user = state
        .database
        .create_user(&req.username, &req.email, &hashed)
        .await?;

    info!("Registered user {} ({})", user.username, user.id);
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Exchange credentials for an access token (POST /api/v1/auth/login)
///
/// Unknown usernames and wrong passwords are indistinguishable to the
/// caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    info!("POST /api/v1/auth/login - {}", req.username);

    let user = state
        .database
        .get_user_by_username(&req.username)
        .await?
        .ok_or(RagChatError::InvalidCredentials)?;

    if !auth::verify_password(&req.password, &user.hashed_password)? {
        return Err(RagChatError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(user.id, &user.username)?;
    Ok(Json(ApiResponse::success(TokenResponse::bearer(token))))
}

/// Current authenticated user (GET /api/v1/users/me)
pub async fn me(CurrentUser(user): CurrentUser) -> ApiResult<UserResponse> {
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}
