//! Request extractors

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::error::ApiError;
use super::handlers::AppState;
use crate::models::User;
use crate::RagChatError;

/// Authenticated user resolved from the `Authorization: Bearer` header
///
/// Verifies the token and loads the user it names; a token for a deleted
/// user is treated as invalid.
pub struct CurrentUser(pub User);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError(RagChatError::InvalidToken))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError(RagChatError::InvalidToken))?;

        let data = state.tokens.verify(token)?;
        let user = state
            .database
            .get_user(data.user_id)
            .await?
            .ok_or(RagChatError::InvalidToken)?;

        Ok(Self(user))
    }
}
